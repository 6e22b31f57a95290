/// Normalize a price cell to a float. The sheets mix European ("1.234,56")
/// and American ("1,234.56") separators; when both appear, whichever comes
/// last is the decimal point. Unparseable text degrades to 0.0 rather than
/// failing the row.
pub fn parse_price(value: &str) -> f64 {
    let mut cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€' && *c != '$')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => {
            // European: dots group thousands, comma is the decimal point
            cleaned = cleaned.replace('.', "").replace(',', ".");
        }
        (Some(_), Some(_)) => {
            // American: commas group thousands
            cleaned = cleaned.replace(',', "");
        }
        (Some(_), None) => {
            cleaned = cleaned.replace(',', ".");
        }
        _ => {}
    }

    cleaned.parse().unwrap_or(0.0)
}

/// Price of an optional line, as (price, leftover remark).
/// Blanks and "SIN INCREMENTO" / "NO INCREMENT" mean the add-on is free; a
/// value parsing to a positive number is the price; anything else is
/// descriptive text ("Consultar") the caller folds into the title.
pub fn parse_optional_price(value: &str) -> (Option<f64>, Option<String>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return (Some(0.0), None);
    }

    let upper = trimmed.to_uppercase();
    if upper.contains("SIN INCREMENTO") || upper.contains("NO INCREMENT") {
        return (Some(0.0), None);
    }

    let price = parse_price(trimmed);
    if price > 0.0 {
        return (Some(price), None);
    }

    (None, Some(trimmed.to_string()))
}

// ── Tests ──
