pub mod catalog;
pub mod price;
pub mod rows;

use anyhow::{bail, Result};

use crate::model::Catalog;
use catalog::CatalogBuilder;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Stop once the second distinct chapter header appears; smoke-test
    /// mode for very large sheets.
    pub first_family_only: bool,
}

/// Fold a row stream into a catalog: classify each row, feed it to the
/// builder, flatten at the end. Row 0 is the sheet header and is skipped.
/// `on_row` fires after each consumed row with (row index, total rows);
/// pass `|_, _| {}` when no progress reporting is wanted.
pub fn parse_rows(
    data: &[Vec<String>],
    opts: &ParseOptions,
    mut on_row: impl FnMut(usize, usize),
) -> Result<Catalog> {
    if data.is_empty() {
        bail!("no rows to parse; the source sheet is empty");
    }

    let total = data.len();
    let mut builder = CatalogBuilder::new(opts.first_family_only);

    for (index, row) in data.iter().enumerate() {
        if index == 0 {
            continue;
        }
        let kind = rows::classify(row, builder.in_optional_section());
        builder.fold(kind);
        on_row(index, total);
        if builder.is_done() {
            break;
        }
    }

    Ok(builder.finish())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    /// Tab-separated fixture rows, cells trimmed the way the reader
    /// normalizes them.
    fn fixture_rows() -> Vec<Vec<String>> {
        let tsv = std::fs::read_to_string("tests/fixtures/tarifa_sample.tsv").unwrap();
        tsv.lines()
            .map(|line| line.split('\t').map(|c| c.trim().to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_input_fails_fast() {
        let err = parse_rows(&[], &ParseOptions::default(), |_, _| {}).unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn header_row_is_skipped() {
        // A lone header row that would classify as an article if consumed
        let data = vec![vec!["7128".to_string(), "SKU".to_string()]];
        let catalog = parse_rows(&data, &ParseOptions::default(), |_, _| {}).unwrap();
        assert_eq!(catalog.summary.items, 0);
    }

    #[test]
    fn progress_fires_once_per_consumed_row() {
        let data = vec![vec![String::new()]; 5];
        let mut calls = Vec::new();
        parse_rows(&data, &ParseOptions::default(), |i, total| calls.push((i, total))).unwrap();
        assert_eq!(calls, [(1, 5), (2, 5), (3, 5), (4, 5)]);
    }

    #[test]
    fn sample_sheet_counts() {
        let catalog = parse_rows(&fixture_rows(), &ParseOptions::default(), |_, _| {}).unwrap();
        assert_eq!(catalog.summary.chapters, 2);
        assert_eq!(catalog.summary.subchapters, 2);
        assert_eq!(catalog.summary.items, 4);
        assert_eq!(catalog.summary.optionals, 3);
        // "Ruedas giratorias" and "Iluminación LED interior" each link both
        // 1.1 articles; chapter 2's optional links its single article.
        assert_eq!(catalog.relations.len(), 5);
    }

    #[test]
    fn sample_sheet_hierarchy() {
        let catalog = parse_rows(&fixture_rows(), &ParseOptions::default(), |_, _| {}).unwrap();

        let depth1: Vec<&str> = catalog
            .families
            .iter()
            .filter(|f| f.depth == 1)
            .map(|f| f.title.as_str())
            .collect();
        assert_eq!(depth1, ["ENFRIADORES", "BOTELLEROS"]);

        for family in catalog.families.iter().filter(|f| f.depth == 2) {
            let parent_code = family.parent_stable_code.as_deref().unwrap();
            let parent = catalog
                .families
                .iter()
                .find(|f| f.stable_code == parent_code)
                .expect("dangling parent code");
            assert_eq!(parent.depth, 1);
            assert!(family.chapter_key.starts_with(&parent.chapter_key));
        }
    }

    #[test]
    fn sample_sheet_prices_and_accents() {
        let catalog = parse_rows(&fixture_rows(), &ParseOptions::default(), |_, _| {}).unwrap();
        let item = catalog
            .items
            .iter()
            .find(|i| i.external_ref == "EFP1000EG")
            .unwrap();
        assert_eq!(item.price, 1234.56);
        assert_eq!(item.title_es, "Enfriador de botellas 1000L");
        assert!(catalog
            .optionals
            .iter()
            .any(|o| o.title_es == "Iluminación LED interior"));
    }

    #[test]
    fn reparse_is_identical() {
        let data = fixture_rows();
        let opts = ParseOptions::default();
        let a = parse_rows(&data, &opts, |_, _| {}).unwrap();
        let b = parse_rows(&data, &opts, |_, _| {}).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn first_family_only_truncates_stream() {
        let catalog = parse_rows(
            &fixture_rows(),
            &ParseOptions {
                first_family_only: true,
            },
            |_, _| {},
        )
        .unwrap();

        // The second chapter header itself is folded, nothing after it is
        assert_eq!(catalog.summary.chapters, 2);
        assert!(catalog.items.iter().all(|i| i.external_ref != "BOT500"));
        assert_eq!(catalog.summary.items, 3);
    }
}
