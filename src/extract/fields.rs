//! Regex-driven field extraction from raw document text.

use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::patterns::{self, DateOrder};
use crate::core::{AmountPolicy, DatePolicy, normalize_iban, normalize_tax_id};

/// Plausible VAT rates, in percent.
const VAT_RATE_RANGE: std::ops::RangeInclusive<Decimal> = dec!(0)..=dec!(25);

/// Everything the pattern tables recover from one text.
///
/// Candidate lists are de-duplicated and kept in document order; the scalar
/// fields are the picks made by the configured policies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    /// Normalized VAT id.
    pub tax_id: Option<String>,
    /// Normalized IBAN.
    pub iban: Option<String>,
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// All amounts, document order, de-duplicated.
    pub amounts: Vec<Decimal>,
    /// All dates, document order, de-duplicated.
    pub dates: Vec<NaiveDate>,
    /// All plausible VAT rates, document order, de-duplicated.
    pub vat_rates: Vec<Decimal>,
    /// Picked total.
    pub total_amount: Option<Decimal>,
    /// Labelled net amount.
    pub net_amount: Option<Decimal>,
    /// Labelled VAT amount.
    pub vat_amount: Option<Decimal>,
    /// Picked invoice date.
    pub invoice_date: Option<NaiveDate>,
    /// Labelled due date.
    pub due_date: Option<NaiveDate>,
    /// First plausible VAT rate.
    pub vat_rate: Option<Decimal>,
}

/// Run every field extractor over `text`.
///
/// Never fails: missing fields stay `None`.
pub fn extract_fields(
    text: &str,
    amount_policy: AmountPolicy,
    date_policy: DatePolicy,
) -> ExtractedFields {
    let amount_hits = amount_candidates(text);
    let date_hits = date_candidates(text, &patterns::DATE);

    let total_amount = match amount_policy {
        AmountPolicy::Maximum => amount_hits.iter().map(|(_, v)| *v).max(),
        AmountPolicy::LastInDocument => amount_hits
            .iter()
            .max_by_key(|(pos, _)| *pos)
            .map(|(_, v)| *v),
    };
    let amounts = dedup(amount_hits.into_iter().map(|(_, v)| v));

    let dates = dedup(date_hits.into_iter().map(|(_, d)| d));
    let invoice_date = match date_policy {
        DatePolicy::FirstInDocument => dates.first().copied(),
        DatePolicy::Earliest => dates.iter().min().copied(),
    };

    let vat_rates = extract_vat_rates(text);

    let fields = ExtractedFields {
        tax_id: extract_tax_id(text),
        iban: extract_iban(text),
        invoice_number: extract_invoice_number(text),
        total_amount,
        net_amount: first_labelled_amount(text, &patterns::NET_AMOUNT),
        vat_amount: first_labelled_amount(text, &patterns::VAT_AMOUNT),
        invoice_date,
        due_date: date_candidates(text, &patterns::DUE_DATE)
            .first()
            .map(|(_, d)| *d),
        vat_rate: vat_rates.first().copied(),
        amounts,
        dates,
        vat_rates,
    };

    debug!(
        tax_id = fields.tax_id.is_some(),
        iban = fields.iban.is_some(),
        invoice_number = fields.invoice_number.is_some(),
        amounts = fields.amounts.len(),
        dates = fields.dates.len(),
        vat_rates = fields.vat_rates.len(),
        "Field extraction finished"
    );

    fields
}

/// First VAT id matched by the ordered pattern list, normalized.
///
/// ```
/// use kontierung::extract::extract_tax_id;
///
/// assert_eq!(extract_tax_id("USt-IdNr.: DE 123 456 789").as_deref(), Some("DE123456789"));
/// assert_eq!(extract_tax_id("no identifier here"), None);
/// ```
pub fn extract_tax_id(text: &str) -> Option<String> {
    first_capture(text, &patterns::TAX_ID, |_| true).map(|raw| normalize_tax_id(&raw))
}

/// First IBAN, labelled pattern first, normalized.
pub fn extract_iban(text: &str) -> Option<String> {
    first_capture(text, &patterns::IBAN, |_| true).map(|raw| normalize_iban(&raw))
}

/// First invoice number containing at least one digit.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    first_capture(text, &patterns::INVOICE_NUMBER, |v| {
        v.chars().any(|c| c.is_ascii_digit())
    })
    .map(|v| v.trim_end_matches(['-', '/']).to_string())
}

/// All amounts in document order, de-duplicated.
pub fn extract_amounts(text: &str) -> Vec<Decimal> {
    dedup(amount_candidates(text).into_iter().map(|(_, v)| v))
}

/// All parseable dates in document order, de-duplicated.
pub fn extract_dates(text: &str) -> Vec<NaiveDate> {
    dedup(
        date_candidates(text, &patterns::DATE)
            .into_iter()
            .map(|(_, d)| d),
    )
}

/// VAT percentages next to MwSt/USt/VAT labels within 0..=25, document order.
pub fn extract_vat_rates(text: &str) -> Vec<Decimal> {
    let mut hits: Vec<(usize, Decimal)> = Vec::new();
    for re in patterns::VAT_RATE.iter() {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            match parse_german_decimal(m.as_str()) {
                Some(rate) if VAT_RATE_RANGE.contains(&rate) => hits.push((m.start(), rate)),
                _ => {}
            }
        }
    }
    hits.sort_by_key(|(pos, _)| *pos);
    dedup(hits.into_iter().map(|(_, r)| r))
}

/// Parse a German-formatted number ("1.234,56") into a decimal.
///
/// ```
/// use kontierung::extract::parse_german_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_german_decimal("1.234,56"), Some(dec!(1234.56)));
/// assert_eq!(parse_german_decimal("19"), Some(dec!(19)));
/// assert_eq!(parse_german_decimal("abc"), None);
/// ```
pub fn parse_german_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}

fn amount_candidates(text: &str) -> Vec<(usize, Decimal)> {
    let mut hits = Vec::new();
    for re in patterns::AMOUNT.iter() {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            if let Some(v) = parse_german_decimal(m.as_str()).filter(|v| *v > Decimal::ZERO) {
                hits.push((m.start(), v));
            }
        }
    }
    hits.sort_by_key(|(pos, _)| *pos);
    hits
}

fn first_labelled_amount(text: &str, patterns: &[Regex]) -> Option<Decimal> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            caps.get(1)
                .and_then(|m| parse_german_decimal(m.as_str()))
                .filter(|v| *v > Decimal::ZERO)
        })
    })
}

fn date_candidates(text: &str, patterns: &[(Regex, DateOrder)]) -> Vec<(usize, NaiveDate)> {
    let mut hits = Vec::new();
    for (re, order) in patterns {
        for caps in re.captures_iter(text) {
            let (Some(a), Some(b), Some(c)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            let (Ok(a_num), Ok(b_num), Ok(c_num)) = (
                a.as_str().parse::<u32>(),
                b.as_str().parse::<u32>(),
                c.as_str().parse::<u32>(),
            ) else {
                continue;
            };
            let date = match order {
                DateOrder::Dmy => NaiveDate::from_ymd_opt(c_num as i32, b_num, a_num),
                DateOrder::Ymd => NaiveDate::from_ymd_opt(a_num as i32, b_num, c_num),
            };
            if let Some(date) = date {
                hits.push((a.start(), date));
            }
        }
    }
    hits.sort_by_key(|(pos, _)| *pos);
    hits
}

/// First capture (group 1, else whole match) across the ordered patterns
/// that satisfies `accept`.
fn first_capture(text: &str, patterns: &[Regex], accept: impl Fn(&str) -> bool) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(0))?;
            let value = m.as_str().trim();
            accept(value).then(|| value.to_string())
        })
    })
}

fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tax_id_with_separators() {
        assert_eq!(extract_tax_id("DE 123.456.789").as_deref(), Some("DE123456789"));
    }

    #[test]
    fn tax_id_labelled_foreign() {
        assert_eq!(
            extract_tax_id("VAT ID: ATU12345678").as_deref(),
            Some("ATU12345678")
        );
        assert_eq!(
            extract_tax_id("Ust-ID: FR 12345678901").as_deref(),
            Some("FR12345678901")
        );
    }

    #[test]
    fn tax_id_not_taken_from_iban() {
        assert_eq!(extract_tax_id("IBAN: DE89 3704 0044 0532 0130 00"), None);
    }

    #[test]
    fn iban_labelled() {
        assert_eq!(
            extract_iban("IBAN: DE89 3704 0044 0532 0130 00\nBIC: COBADEFFXXX").as_deref(),
            Some("DE89370400440532013000")
        );
    }

    #[test]
    fn iban_bare_fallback() {
        assert_eq!(
            extract_iban("Konto DE89370400440532013000 bei der Commerzbank").as_deref(),
            Some("DE89370400440532013000")
        );
    }

    #[test]
    fn iban_ignores_vat_id() {
        assert_eq!(extract_iban("USt-IdNr: DE123456789"), None);
    }

    #[test]
    fn invoice_number_variants() {
        assert_eq!(
            extract_invoice_number("Rechnung Nr. RF12345678").as_deref(),
            Some("RF12345678")
        );
        assert_eq!(
            extract_invoice_number("Rechnungsnummer: 2024-0815").as_deref(),
            Some("2024-0815")
        );
        assert_eq!(
            extract_invoice_number("Invoice No: INV/2024/77").as_deref(),
            Some("INV/2024/77")
        );
        assert_eq!(
            extract_invoice_number("RG-Nr.: 4711").as_deref(),
            Some("4711")
        );
    }

    #[test]
    fn invoice_number_requires_digit() {
        assert_eq!(extract_invoice_number("Rechnung Nr. siehe Anlage"), None);
    }

    #[test]
    fn amounts_deduplicated_in_order() {
        let text = "Netto 1.000,00 €\nMwSt 190,00 €\nGesamtbetrag: 1.190,00 EUR\nSumme 1.190,00";
        assert_eq!(
            extract_amounts(text),
            vec![dec!(1000.00), dec!(190.00), dec!(1190.00)]
        );
    }

    #[test]
    fn amount_without_thousands_separator() {
        assert_eq!(extract_amounts("Betrag 1234,56 €"), vec![dec!(1234.56)]);
    }

    #[test]
    fn amount_policy_last() {
        let text = "Gesamt 2.000,00 €\nabzgl. Anzahlung 500,00 €";
        let max = extract_fields(text, AmountPolicy::Maximum, DatePolicy::FirstInDocument);
        let last = extract_fields(text, AmountPolicy::LastInDocument, DatePolicy::FirstInDocument);
        assert_eq!(max.total_amount, Some(dec!(2000.00)));
        assert_eq!(last.total_amount, Some(dec!(500.00)));
    }

    #[test]
    fn dates_all_formats() {
        let text = "Lieferung 2024-03-01, Rechnung 05.03.2024, Versand 07/03/2024";
        assert_eq!(
            extract_dates(text),
            vec![date(2024, 3, 1), date(2024, 3, 5), date(2024, 3, 7)]
        );
    }

    #[test]
    fn invalid_calendar_dates_skipped() {
        assert_eq!(extract_dates("31.02.2024 und 15.01.2024"), vec![date(2024, 1, 15)]);
    }

    #[test]
    fn date_policy_earliest() {
        let text = "Fällig am 30.04.2024\nRechnungsdatum: 31.03.2024";
        let first = extract_fields(text, AmountPolicy::Maximum, DatePolicy::FirstInDocument);
        let earliest = extract_fields(text, AmountPolicy::Maximum, DatePolicy::Earliest);
        assert_eq!(first.invoice_date, Some(date(2024, 4, 30)));
        assert_eq!(earliest.invoice_date, Some(date(2024, 3, 31)));
        assert_eq!(first.due_date, Some(date(2024, 4, 30)));
    }

    #[test]
    fn vat_rates_filtered() {
        let text = "zzgl. 19 % MwSt\nUSt 7%\nRabatt 30 % USt\nMwSt. 19,00 %";
        assert_eq!(extract_vat_rates(text), vec![dec!(19), dec!(7)]);
    }

    #[test]
    fn labelled_vat_and_net_amounts() {
        let text = "Nettobetrag: 1.000,00 €\nzzgl. 19% MwSt: 190,00 €\nGesamtbetrag: 1.190,00 €";
        let fields = extract_fields(text, AmountPolicy::Maximum, DatePolicy::FirstInDocument);
        assert_eq!(fields.net_amount, Some(dec!(1000.00)));
        assert_eq!(fields.vat_amount, Some(dec!(190.00)));
        assert_eq!(fields.total_amount, Some(dec!(1190.00)));
        assert_eq!(fields.vat_rate, Some(dec!(19)));
    }

    #[test]
    fn vat_rate_not_mistaken_for_vat_amount() {
        let text = "MwSt 19,00 %\nGesamtbetrag: 119,00 €";
        let fields = extract_fields(text, AmountPolicy::Maximum, DatePolicy::FirstInDocument);
        assert_eq!(fields.vat_amount, None);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let fields = extract_fields("", AmountPolicy::Maximum, DatePolicy::FirstInDocument);
        assert_eq!(fields, ExtractedFields::default());
    }
}
