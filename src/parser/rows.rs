use std::sync::LazyLock;

use regex::Regex;

// Tarifa sheet column layout:
// A(0): numeric id | B(1): SKU | C(2): code label | D(3): descripción (ES) |
// E(4): description (EN) | F-H(5-7): reserved | I(8): PVP
pub const COL_ID: usize = 0;
pub const COL_SKU: usize = 1;
pub const COL_CODE: usize = 2;
pub const COL_DESC_ES: usize = 3;
pub const COL_DESC_EN: usize = 4;
pub const COL_PRICE: usize = 8;

// "1. ENFRIADORES" or "1 ENFRIADORES": number, then a period (spacing
// optional) or whitespace, then an all-caps title.
static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.\s*|\s+)([A-ZÁÉÍÓÚÑ][A-ZÁÉÍÓÚÑ\s&]+)$").unwrap()
});

// "1.1 Refrigerador de botellas": two dotted numbers, then free text.
static SUBCHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\s+(.+)$").unwrap());

/// One of the five structural row shapes a tarifa sheet can carry, plus
/// `Ignorable` for blank rows and stray header/footer text.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// "OPCIONAL" marker; the rows below it are add-ons.
    OptionalMarker,
    Chapter {
        number: String,
        title: String,
    },
    Subchapter {
        chapter: String,
        number: String,
        title: String,
    },
    OptionalLine {
        title_es: String,
        title_en: String,
        price: String,
    },
    Article {
        numeric_id: String,
        external_ref: String,
        code_label: String,
        title_es: String,
        title_en: String,
        price: String,
    },
    Ignorable,
}

/// Classify one row of trimmed cells. Rules are tried in precedence order
/// and the first match across the row's text cells wins. `in_optional_section`
/// is the builder's flag set by a previous `OptionalMarker` row.
pub fn classify(cells: &[String], in_optional_section: bool) -> RowKind {
    let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

    // Structure only ever appears in the id/SKU/code/description columns.
    let texts: Vec<&str> = [COL_ID, COL_SKU, COL_CODE, COL_DESC_ES, COL_DESC_EN]
        .iter()
        .map(|&i| cell(i))
        .filter(|t| !t.is_empty())
        .collect();

    if texts.is_empty() && cell(COL_PRICE).is_empty() {
        return RowKind::Ignorable;
    }

    // 1. Optional-section marker, in any column (the sheet is bilingual)
    if texts
        .iter()
        .any(|t| t.eq_ignore_ascii_case("OPCIONAL") || t.eq_ignore_ascii_case("OPTIONAL"))
    {
        return RowKind::OptionalMarker;
    }

    // 2. Chapter header
    for t in &texts {
        if let Some(caps) = CHAPTER_RE.captures(t) {
            return RowKind::Chapter {
                number: caps[1].to_string(),
                title: caps[2].trim().to_string(),
            };
        }
    }

    // 3. Sub-chapter header (never matches a chapter: it needs the second
    // digit group)
    for t in &texts {
        if let Some(caps) = SUBCHAPTER_RE.captures(t) {
            return RowKind::Subchapter {
                chapter: caps[1].to_string(),
                number: caps[2].to_string(),
                title: caps[3].trim().to_string(),
            };
        }
    }

    // 4. Optional line: no id, inside an OPCIONAL block. Title comes from
    // the code column when present, else the Spanish description.
    if cell(COL_ID).is_empty() && in_optional_section {
        let title_es = if !cell(COL_CODE).is_empty() {
            cell(COL_CODE)
        } else {
            cell(COL_DESC_ES)
        };
        return RowKind::OptionalLine {
            title_es: title_es.to_string(),
            title_en: cell(COL_DESC_EN).to_string(),
            price: cell(COL_PRICE).to_string(),
        };
    }

    // 5. Article line: all-digit id in the first column
    let id = cell(COL_ID);
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        return RowKind::Article {
            numeric_id: id.to_string(),
            external_ref: cell(COL_SKU).to_string(),
            code_label: cell(COL_CODE).to_string(),
            title_es: cell(COL_DESC_ES).to_string(),
            title_en: cell(COL_DESC_EN).to_string(),
            price: cell(COL_PRICE).to_string(),
        };
    }

    RowKind::Ignorable
}

// ── Tests ──
