use serde::Serialize;

/// A chapter (depth 1) or sub-chapter (depth 2) node of the catalog tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Family {
    pub stable_code: String,
    pub chapter_key: String,
    pub title: String,
    pub parent_stable_code: Option<String>,
    pub depth: u8,
}

/// A purchasable article. Duplicates in the source are preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub external_ref: String,
    /// Digit string from the identifier column; kept as text so leading
    /// zeros survive the round trip.
    pub numeric_id: String,
    pub code_label: String,
    pub family_stable_code: Option<String>,
    pub title_es: String,
    pub title_en: String,
    pub price: f64,
    pub active: bool,
}

/// An add-on line, deduplicated per run by normalized Spanish title.
/// `price` is None when the sheet carried descriptive text instead of a
/// number (the text is folded into the titles).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optional {
    pub id: String,
    pub title_es: String,
    pub title_en: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub item_external_ref: String,
    pub optional_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub chapters: usize,
    pub subchapters: usize,
    pub items: usize,
    pub optionals: usize,
}

/// Flattened parse result. Rebuilt from empty on every parse invocation;
/// list order is first-appearance order in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub summary: Summary,
    pub families: Vec<Family>,
    pub items: Vec<Item>,
    pub optionals: Vec<Optional>,
    pub relations: Vec<Relation>,
}
