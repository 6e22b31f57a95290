use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

/// Load the first sheet of a tarifa workbook as trimmed-string rows.
/// Returns the rows and the sheet name they came from.
pub fn load_rows(path: &Path) -> Result<(Vec<Vec<String>>, String)> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet '{}'", sheet_name))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    info!("loaded {} rows from sheet '{}'", rows.len(), sheet_name);
    Ok((rows, sheet_name))
}

/// Render a cell the way the classifier expects: trimmed text, blanks as
/// "", and integral numbers without a trailing ".0" so the digit check on
/// the identifier column holds.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

// ── Tests ──
