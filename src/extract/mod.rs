//! Invoice understanding: field extraction, supplier template recognition,
//! and document text sources.
//!
//! [`extract_invoice_data`] is the one-call entry point: it runs the ordered
//! pattern tables over the text, recognizes the supplier template, lets the
//! template's refiner override what it knows better, and scores the result.
//!
//! # Example
//!
//! ```
//! use kontierung::core::{EngineConfig, Template};
//! use kontierung::extract::extract_invoice_data;
//! use rust_decimal_macros::dec;
//!
//! let text = "FAMO GmbH Rechnung Nr. RF12345678 Betrag: 1.190,00 EUR USt-IdNr: DE123456789";
//! let data = extract_invoice_data(text, &EngineConfig::default());
//!
//! assert_eq!(data.template, Template::Famo);
//! assert_eq!(data.supplier_name.as_deref(), Some("FAMO GmbH"));
//! assert_eq!(data.invoice_number.as_deref(), Some("RF12345678"));
//! assert_eq!(data.total_amount, Some(dec!(1190.00)));
//! assert_eq!(data.supplier_tax_id.as_deref(), Some("DE123456789"));
//! ```

mod fields;
mod patterns;
mod source;
mod template;

pub use fields::{
    ExtractedFields, extract_amounts, extract_dates, extract_fields, extract_iban,
    extract_invoice_number, extract_tax_id, extract_vat_rates, parse_german_decimal,
};
pub use source::{
    DocumentTextSource, MIN_PDF_TEXT_CHARS, OcrEngine, TextSource, detect_mime_type,
};
pub use template::{
    KeywordRule, TemplateFields, TemplateProfile, legal_entity_name, recognize_template, refine,
    supplier_address,
};

use tracing::info;

use crate::core::{EngineConfig, ExtractedInvoiceData};

/// Points per recovered key field (tax id, IBAN, invoice number, total, date).
const FIELD_POINTS: u32 = 20;

/// Extract structured invoice data from document text.
///
/// Never fails; fields that cannot be found stay `None`.
pub fn extract_invoice_data(text: &str, config: &EngineConfig) -> ExtractedInvoiceData {
    let fields = extract_fields(text, config.amount_policy, config.date_policy);
    let template = recognize_template(text);
    let refined = refine(template, text);

    let net_amount = fields.net_amount.or(match (fields.total_amount, fields.vat_amount) {
        (Some(total), Some(vat)) if vat < total => Some(total - vat),
        _ => None,
    });

    let mut data = ExtractedInvoiceData {
        supplier_name: refined.supplier_name,
        supplier_tax_id: fields.tax_id,
        supplier_address: refined.supplier_address,
        invoice_number: refined.invoice_number.or(fields.invoice_number),
        invoice_date: fields.invoice_date,
        due_date: fields.due_date,
        total_amount: fields.total_amount,
        net_amount,
        vat_amount: fields.vat_amount,
        vat_rate: fields.vat_rate,
        iban: fields.iban,
        extracted_text: text.to_string(),
        confidence: 0,
        template,
    };
    data.confidence = extraction_confidence(&data);

    info!(
        template = template.code(),
        supplier = data.supplier_name.as_deref().unwrap_or("-"),
        confidence = data.confidence,
        "Invoice data extracted"
    );
    data
}

/// Share of key fields recovered, as a rounded percentage.
///
/// A recognized template adds a bonus on top of the field points.
pub fn extraction_confidence(data: &ExtractedInvoiceData) -> u8 {
    let present = [
        data.supplier_tax_id.is_some(),
        data.iban.is_some(),
        data.invoice_number.is_some(),
        data.total_amount.is_some(),
        data.invoice_date.is_some(),
    ]
    .into_iter()
    .filter(|p| *p)
    .count() as u32;

    let mut score = present * FIELD_POINTS;
    let mut max = 5 * FIELD_POINTS;
    if data.template.is_known() {
        score += FIELD_POINTS;
        max += FIELD_POINTS;
    }
    ((score * 100 + max / 2) / max) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Template;
    use rust_decimal_macros::dec;

    #[test]
    fn template_number_wins_over_generic() {
        let text = "Sonepar Deutschland\nRechnungsnummer: 77\nRE-123456789\nSumme 100,00";
        let data = extract_invoice_data(text, &EngineConfig::default());
        assert_eq!(data.template, Template::Sonepar);
        assert_eq!(data.invoice_number.as_deref(), Some("123456789"));
    }

    #[test]
    fn generic_number_used_when_template_has_none() {
        let text = "Musterfirma GmbH\nRechnungsnummer: 2024-77";
        let data = extract_invoice_data(text, &EngineConfig::default());
        assert_eq!(data.invoice_number.as_deref(), Some("2024-77"));
        assert_eq!(data.supplier_name.as_deref(), Some("Musterfirma GmbH"));
    }

    #[test]
    fn net_derived_from_total_and_vat() {
        let text = "Gesamtbetrag: 119,00 €\nMwSt 19,00 €";
        let data = extract_invoice_data(text, &EngineConfig::default());
        assert_eq!(data.total_amount, Some(dec!(119.00)));
        assert_eq!(data.vat_amount, Some(dec!(19.00)));
        assert_eq!(data.net_amount, Some(dec!(100.00)));
    }

    #[test]
    fn confidence_counts_fields() {
        let mut data = ExtractedInvoiceData::default();
        assert_eq!(extraction_confidence(&data), 0);
        data.total_amount = Some(dec!(1));
        data.invoice_number = Some("1".into());
        assert_eq!(extraction_confidence(&data), 40);
        data.template = Template::Famo;
        assert_eq!(extraction_confidence(&data), 50);
    }

    #[test]
    fn empty_text_yields_empty_data() {
        let data = extract_invoice_data("", &EngineConfig::default());
        assert_eq!(data.supplier_name, None);
        assert_eq!(data.total_amount, None);
        assert_eq!(data.template, Template::Generic);
        assert_eq!(data.confidence, 0);
    }
}
