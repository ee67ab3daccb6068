//! Canonical forms for identifiers compared across documents and the
//! creditor directory.

/// Normalize a VAT identifier (USt-IdNr): strip whitespace and separators,
/// upper-case.
///
/// ```
/// use kontierung::core::normalize_tax_id;
///
/// assert_eq!(normalize_tax_id("de 123.456.789"), "DE123456789");
/// ```
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '-' | '/' | ':'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Normalize an IBAN: strip whitespace, upper-case.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Normalize a company name for comparison: trim, collapse inner whitespace,
/// lower-case.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
