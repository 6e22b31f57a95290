use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::model::{Catalog, Family, Item, Optional, Relation};

/// Import-file header: where the data came from and what it holds.
#[derive(Debug, Serialize)]
struct Metadata<'a> {
    generated_at: DateTime<Local>,
    source_file: &'a str,
    chapters: usize,
    subchapters: usize,
    items: usize,
    optionals: usize,
}

/// Top-level JSON document consumed by the catalog import.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    metadata: Metadata<'a>,
    families: &'a [Family],
    items: &'a [Item],
    optionals: &'a [Optional],
    relations: &'a [Relation],
}

/// Write the catalog as a JSON import file. Spanish titles keep their
/// accents: serde_json emits raw UTF-8, no escaping.
pub fn write_json(catalog: &Catalog, source_file: &str, output: &Path, pretty: bool) -> Result<()> {
    let envelope = Envelope {
        metadata: Metadata {
            generated_at: Local::now(),
            source_file,
            chapters: catalog.summary.chapters,
            subchapters: catalog.summary.subchapters,
            items: catalog.summary.items,
            optionals: catalog.summary.optionals,
        },
        families: &catalog.families,
        items: &catalog.items,
        optionals: &catalog.optionals,
        relations: &catalog.relations,
    };

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &envelope)?;
    } else {
        serde_json::to_writer(&mut writer, &envelope)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("wrote catalog JSON to {}", output.display());
    Ok(())
}

// ── Tests ──
