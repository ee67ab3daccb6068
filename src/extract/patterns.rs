//! Ordered pattern tables for field extraction.
//!
//! Each table is evaluated in declaration order; adding a layout means adding
//! a row here, not a branch in the extractor.

use std::sync::LazyLock;

use regex::Regex;

/// German-formatted decimal: thousands `.`, decimal `,`, exactly two places.
macro_rules! german_number {
    () => {
        r"(\d{1,3}(?:\.\d{3})+,\d{2}|\d+,\d{2})"
    };
}

/// Order of the captured date components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateOrder {
    /// Day, month, year.
    Dmy,
    /// Year, month, day.
    Ymd,
}

pub(crate) const TAX_ID_PATTERNS: &[&str] = &[
    r"\bDE(?:[ .]?\d){9}\b",
    r"(?i)USt[\s\-]*Id[\s\-]*Nr[\s.:]*([A-Z]{2}\s*\d{8,12})",
    r"(?i)USt[\s\-]*ID[\s.:]*([A-Z]{2}\s*\d{8,12})",
    r"(?i)VAT[\s\-]*(?:ID|Reg\.?\s*No\.?)[\s.:]*([A-Z]{2}\s*[0-9A-Z]{8,12})",
];

pub(crate) const IBAN_PATTERNS: &[&str] = &[
    r"(?i)IBAN[\s.:]*([A-Z]{2}\s?\d{2}(?:[ ]?\d){12,30})",
    r"\b([A-Z]{2}\d{2}(?:[ ]?\d){12,30})\b",
];

pub(crate) const INVOICE_NUMBER_PATTERNS: &[&str] = &[
    r"(?i)Rechnung[\s\-]*Nr[\s.:]*([A-Z0-9][A-Z0-9\-/]*)",
    r"(?i)Rechnungs[\s\-]*nummer[\s.:]*([A-Z0-9][A-Z0-9\-/]*)",
    r"(?i)Invoice[\s\-]*(?:Number|No)[\s.:]*([A-Z0-9][A-Z0-9\-/]*)",
    r"(?i)\bRG[\s\-]*Nr[\s.:]*([A-Z0-9][A-Z0-9\-/]*)",
];

pub(crate) const AMOUNT_PATTERNS: &[&str] = &[
    concat!(r"\b", german_number!(), r"\s*€"),
    concat!(r"\b", german_number!(), r"\s*EUR\b"),
    concat!(r"€\s*", german_number!()),
    concat!(r"\bEUR\s*", german_number!()),
    concat!(r"(?i)Summe[\s.:]*", german_number!()),
    concat!(r"(?i)Gesamtbetrag[\s.:]*", german_number!()),
];

pub(crate) const VAT_AMOUNT_PATTERNS: &[&str] = &[
    concat!(
        r"(?i)\d{1,2}(?:,\d{1,2})?\s*%\s*(?:MwSt|USt)\.?[\s.:]*(?:€|EUR)?\s*",
        german_number!(),
        r"\s*(?:€|EUR)"
    ),
    concat!(
        r"(?i)(?:MwSt|USt|Umsatzsteuer|Mehrwertsteuer)\.?[\s.:]*(?:\d{1,2}(?:,\d{1,2})?\s*%[\s.:]*)?(?:€|EUR)?\s*",
        german_number!(),
        r"\s*(?:€|EUR)"
    ),
];

pub(crate) const NET_AMOUNT_PATTERNS: &[&str] = &[concat!(
    r"(?i)(?:Nettobetrag|Netto|Zwischensumme|Summe\s+netto)[\s.:]*(?:€|EUR)?\s*",
    german_number!()
)];

pub(crate) const DATE_PATTERNS: &[(&str, DateOrder)] = &[
    (r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b", DateOrder::Dmy),
    (r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b", DateOrder::Dmy),
    (r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b", DateOrder::Ymd),
    (
        r"(?i)(?:Rechnungs)?datum[\s.:]*(\d{1,2})[.\-/](\d{1,2})[.\-/](\d{4})",
        DateOrder::Dmy,
    ),
];

pub(crate) const DUE_DATE_PATTERNS: &[(&str, DateOrder)] = &[(
    r"(?i)(?:fällig(?:\s+am)?|zahlbar\s+bis(?:\s+zum)?|Fälligkeit(?:sdatum)?|due\s+date)[\s.:]*(\d{1,2})[.\-/](\d{1,2})[.\-/](\d{4})",
    DateOrder::Dmy,
)];

pub(crate) const VAT_RATE_PATTERNS: &[&str] = &[
    r"(?i)\b(\d{1,2}(?:,\d{1,2})?)\s*%\s*(?:MwSt|USt|VAT)",
    r"(?i)(?:MwSt|USt|VAT)\.?[\s.:]*(\d{1,2}(?:,\d{1,2})?)\s*%",
];

/// Company line: greedy prefix up to the last legal-form suffix on the line.
pub(crate) const LEGAL_ENTITY_PATTERN: &str =
    r"^\s*(.*(?:\b(?:GmbH|AG|KG|UG|OHG)\b|\be\.\s?K\.))";

pub(crate) const ADDRESS_PATTERN: &str = r"([A-ZÄÖÜ][\wäöüß.\- ]*?(?:straße|strasse|str\.|weg|platz|allee|gasse|ring)\s*\d+\s?[a-z]?)\s*,?\s*(\d{5})\s+([A-ZÄÖÜ][\wäöüß\-]+)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("built-in pattern must compile"))
        .collect()
}

fn compile_dates(patterns: &[(&str, DateOrder)]) -> Vec<(Regex, DateOrder)> {
    patterns
        .iter()
        .map(|(p, order)| (Regex::new(p).expect("built-in pattern must compile"), *order))
        .collect()
}

pub(crate) static TAX_ID: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(TAX_ID_PATTERNS));
pub(crate) static IBAN: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(IBAN_PATTERNS));
pub(crate) static INVOICE_NUMBER: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(INVOICE_NUMBER_PATTERNS));
pub(crate) static AMOUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(AMOUNT_PATTERNS));
pub(crate) static VAT_AMOUNT: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(VAT_AMOUNT_PATTERNS));
pub(crate) static NET_AMOUNT: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(NET_AMOUNT_PATTERNS));
pub(crate) static DATE: LazyLock<Vec<(Regex, DateOrder)>> =
    LazyLock::new(|| compile_dates(DATE_PATTERNS));
pub(crate) static DUE_DATE: LazyLock<Vec<(Regex, DateOrder)>> =
    LazyLock::new(|| compile_dates(DUE_DATE_PATTERNS));
pub(crate) static VAT_RATE: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(VAT_RATE_PATTERNS));
pub(crate) static LEGAL_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LEGAL_ENTITY_PATTERN).expect("built-in pattern must compile"));
pub(crate) static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("built-in pattern must compile"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(TAX_ID.len(), TAX_ID_PATTERNS.len());
        assert_eq!(IBAN.len(), IBAN_PATTERNS.len());
        assert_eq!(INVOICE_NUMBER.len(), INVOICE_NUMBER_PATTERNS.len());
        assert_eq!(AMOUNT.len(), AMOUNT_PATTERNS.len());
        assert_eq!(VAT_AMOUNT.len(), VAT_AMOUNT_PATTERNS.len());
        assert_eq!(NET_AMOUNT.len(), NET_AMOUNT_PATTERNS.len());
        assert_eq!(DATE.len(), DATE_PATTERNS.len());
        assert_eq!(DUE_DATE.len(), DUE_DATE_PATTERNS.len());
        assert_eq!(VAT_RATE.len(), VAT_RATE_PATTERNS.len());
        assert!(LEGAL_ENTITY.is_match("Musterfirma GmbH"));
        assert!(ADDRESS.is_match("Musterstraße 12, 10115 Berlin"));
    }

    #[test]
    fn german_number_rejects_three_decimals() {
        let re = Regex::new(concat!("^", german_number!(), "$")).unwrap();
        assert!(re.is_match("1.234,56"));
        assert!(re.is_match("1234,56"));
        assert!(!re.is_match("1.234,567"));
        assert!(!re.is_match("12.34,56"));
    }
}
