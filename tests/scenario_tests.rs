//! End-to-end acceptance scenarios.

use chrono::NaiveDate;
use kontierung::accounts::AccountRegistry;
use kontierung::booking::{AccountSuggester, BookingComposer, ComposeContext, REVIEW_MARKER};
use kontierung::core::*;
use kontierung::creditor::{CreditorResolver, InMemoryDirectory, MatchBasis};
use kontierung::extract::extract_invoice_data;
use kontierung::pipeline::{InvoiceProcessor, ProcessingOutcome};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const FAMO_TEXT: &str =
    "FAMO GmbH Rechnung Nr. RF12345678 Betrag: 1.190,00 EUR USt-IdNr: DE123456789";

// ---------------------------------------------------------------------------
// Scenario A: known creditor with curated default account
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_creditor_default_wins_over_template() {
    let registry = AccountRegistry::skr03();
    let directory = InMemoryDirectory::with_creditors(vec![
        CreditorBuilder::new("K-100", "FAMO GmbH")
            .tax_id("DE123456789")
            .default_account("4400")
            .build(),
    ]);
    let processor = InvoiceProcessor::new(&registry, &directory, EngineConfig::default())
        .with_booking_date(date(2024, 3, 1));

    let doc = processor.process_text("famo-1", FAMO_TEXT).unwrap();
    assert_eq!(doc.extracted.template, Template::Famo);
    assert_eq!(doc.creditor_match, Some(MatchBasis::TaxId));
    assert!(!doc.creditor_created);

    let proposal = doc.proposal.unwrap();
    assert_eq!(proposal.debit_account, "4400");
    assert_eq!(proposal.credit_account, "1600");
    assert_eq!(proposal.amount, dec!(1190.00));
    assert_eq!(proposal.creditor_id.as_deref(), Some("K-100"));
    assert!(proposal.confidence >= 80, "confidence {}", proposal.confidence);
    assert!(!proposal.review_required);
}

// ---------------------------------------------------------------------------
// Scenario B: nothing recognizable
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_no_signals_no_proposal() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

    let suggester = AccountSuggester::new(&registry, &config);
    assert!(suggester.suggest(text, None, Template::Generic, None).is_none());

    let ctx = ComposeContext::new("b-1", text, date(2024, 3, 1));
    assert!(BookingComposer::new(&registry, &config).compose(&ctx).is_none());

    let directory = InMemoryDirectory::new();
    let doc = InvoiceProcessor::new(&registry, &directory, config)
        .process_text("b-1", text)
        .unwrap();
    assert!(doc.proposal.is_none());
    assert!(doc.creditor.is_none());
    assert_eq!(doc.outcome(), ProcessingOutcome::PendingManualBooking);
    assert_eq!(directory.count().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Scenario C: unknown supplier gets a new creditor
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_unknown_supplier_is_created() {
    let directory = InMemoryDirectory::with_creditors(vec![
        CreditorBuilder::new("K-1", "FAMO GmbH").tax_id("DE111111111").build(),
        CreditorBuilder::new("K-2", "Sonepar Deutschland GmbH").build(),
    ]);
    let resolver = CreditorResolver::new(&directory);

    let text = "Musterfirma GmbH\nHauptstraße 5, 10115 Berlin\nUSt-IdNr.: DE987654321\n\
                Rechnung Nr. 2024-17\nSumme 450,00 €";
    let data = extract_invoice_data(text, &EngineConfig::default());
    assert_eq!(data.supplier_name.as_deref(), Some("Musterfirma GmbH"));
    assert_eq!(data.supplier_tax_id.as_deref(), Some("DE987654321"));

    let found = resolver
        .resolve(
            data.supplier_name.as_deref(),
            data.supplier_tax_id.as_deref(),
            data.iban.as_deref(),
        )
        .unwrap();
    assert!(found.is_none());

    let created = resolver
        .create_from_invoice_data(&data, date(2024, 3, 1))
        .unwrap()
        .unwrap();
    assert_eq!(created.name, "Musterfirma GmbH");
    assert_eq!(created.tax_id.as_deref(), Some("DE987654321"));
    assert_eq!(
        created.address.as_deref(),
        Some("Hauptstraße 5, 10115 Berlin")
    );
    assert!(created.is_active);
    assert_eq!(
        created.notes.as_deref(),
        Some("Automatically created from invoice on 01.03.2024")
    );
    assert_eq!(directory.count().unwrap(), 3);

    // The next invoice from the same supplier resolves by tax id.
    let again = resolver
        .resolve(None, Some("DE 987 654 321"), None)
        .unwrap()
        .unwrap();
    assert_eq!(again.creditor.id, created.id);
}

// ---------------------------------------------------------------------------
// Scenario D: large generic invoice
// ---------------------------------------------------------------------------

#[test]
fn scenario_d_large_amount_needs_review() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let composer = BookingComposer::new(&registry, &config);
    let text = "Musterbau GmbH\nReparatur und Wartung der Anlage\nGesamtbetrag: 12.000,00 EUR";

    let mut ctx = ComposeContext::new("d-1", text, date(2024, 3, 1));
    ctx.supplier_name = Some("Musterbau GmbH");
    ctx.amount = Some(dec!(12000));
    let large = composer.compose(&ctx).unwrap();

    ctx.amount = Some(dec!(9000));
    let normal = composer.compose(&ctx).unwrap();

    assert_eq!(large.credit_account, "1700");
    assert_eq!(normal.credit_account, "1600");
    assert_eq!(large.debit_account, "4800");
    assert!(large.review_required);
    assert!(large.explanation.contains(REVIEW_MARKER));
    assert!(!normal.explanation.contains(REVIEW_MARKER));
    assert!(large.confidence <= normal.confidence);
    assert!(large.confidence <= config.review_confidence_cap);
}

#[test]
fn scenario_d_through_pipeline() {
    let registry = AccountRegistry::skr03();
    let directory = InMemoryDirectory::new();
    let processor = InvoiceProcessor::new(&registry, &directory, EngineConfig::default());
    let doc = processor
        .process_text(
            "d-2",
            "Musterbau GmbH\nReparatur und Wartung der Anlage\nGesamtbetrag: 12.000,00 EUR",
        )
        .unwrap();
    assert_eq!(doc.extracted.template, Template::Generic);
    let proposal = doc.proposal.unwrap();
    assert_eq!(proposal.credit_account, "1700");
    assert!(
        proposal
            .explanation_fragments()
            .any(|f| f.starts_with(REVIEW_MARKER))
    );
}
