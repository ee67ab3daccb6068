//! Account suggestion and booking composition tests.

use chrono::NaiveDate;
use kontierung::accounts::{AccountRegistry, AccountType};
use kontierung::booking::*;
use kontierung::core::*;
use kontierung::creditor::MatchBasis;
use rust_decimal_macros::dec;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

const SONEPAR_LINES: &str = "Kabel NYM-J 100m\nSchalter Serie 55";

// ---------------------------------------------------------------------------
// Suggestion priority
// ---------------------------------------------------------------------------

#[test]
fn suggestion_priority_chain() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let s = AccountSuggester::new(&registry, &config);

    let by_default = s
        .suggest_scored(SONEPAR_LINES, Some("Sonepar"), Template::Sonepar, Some("4985"))
        .unwrap();
    assert_eq!(by_default.account.code, "4985");
    assert_eq!(by_default.basis, SuggestionBasis::CreditorDefault);

    let by_template = s
        .suggest_scored(SONEPAR_LINES, Some("Sonepar"), Template::Sonepar, None)
        .unwrap();
    assert_eq!(by_template.account.code, "3400");
    assert_eq!(by_template.basis, SuggestionBasis::TemplateRule { keyword: "kabel" });

    let by_keywords = s
        .suggest_scored("Papier, Toner und Ordner", None, Template::Generic, None)
        .unwrap();
    assert_eq!(by_keywords.account.code, "4930");
    assert!(matches!(by_keywords.basis, SuggestionBasis::KeywordScan { hits: 3 }));

    let by_supplier = s
        .suggest_scored(
            "Zahlungsaufforderung",
            Some("Finanzamt Berlin-Mitte"),
            Template::Generic,
            None,
        )
        .unwrap();
    assert_eq!(by_supplier.account.code, "4340");

    let fallback = s
        .suggest_scored(
            "Leistung laut Vereinbarung",
            Some("Musterfirma GmbH"),
            Template::Generic,
            None,
        )
        .unwrap();
    assert_eq!(fallback.account.code, "4900");
    assert_eq!(fallback.basis, SuggestionBasis::Fallback);

    assert!(
        s.suggest("Leistung laut Vereinbarung", None, Template::Generic, None)
            .is_none()
    );
}

#[test]
fn custom_chart_threshold() {
    let registry = AccountRegistry::skr03();
    let strict = EngineConfigBuilder::new().min_keyword_score(40).build();
    let s = AccountSuggester::new(&registry, &strict);
    assert!(
        s.suggest("Papier, Toner und Ordner", None, Template::Generic, None)
            .is_none()
    );
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn sonepar_proposal() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let creditor = CreditorBuilder::new("K-2", "Sonepar Deutschland GmbH")
        .tax_id("DE811123456")
        .build();

    let mut ctx = ComposeContext::new("s-1", SONEPAR_LINES, day());
    ctx.supplier_name = Some("Sonepar Deutschland");
    ctx.supplier_tax_id = Some("DE811123456");
    ctx.creditor = Some(&creditor);
    ctx.creditor_match = Some(MatchBasis::TaxId);
    ctx.amount = Some(dec!(119.00));
    ctx.vat_rate = Some(dec!(19));
    ctx.template = Template::Sonepar;
    ctx.invoice_number = Some("1234567890");

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.debit_account, "3400");
    assert_eq!(p.credit_account, "70010");
    assert_eq!(p.vat_amount, Some(dec!(19.00)));
    assert_eq!(p.creditor_id.as_deref(), Some("K-2"));
    assert_eq!(p.booking_text, "Elektromaterial Sonepar, Re-Nr. 1234567890");
    assert_eq!(p.booking_date, day());

    let fragments: Vec<&str> = p.explanation_fragments().collect();
    assert!(fragments[0].starts_with("Account 3400"));
    assert_eq!(fragments[1], "Creditor K-2 matched by tax id");
    assert_eq!(fragments[2], "Template detected: SONEPAR");
    assert_eq!(fragments[3], "VAT 19% = 19.00 EUR");
}

#[test]
fn creditor_payable_account_beats_template() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let creditor = CreditorBuilder::new("K-9", "Sonepar Süd GmbH")
        .payable_account("1610")
        .build();
    let mut ctx = ComposeContext::new("s-2", SONEPAR_LINES, day());
    ctx.creditor = Some(&creditor);
    ctx.creditor_match = Some(MatchBasis::ExactName);
    ctx.amount = Some(dec!(50000));
    ctx.template = Template::Sonepar;

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.credit_account, "1610");
}

#[test]
fn identified_creditor_raises_confidence() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let composer = BookingComposer::new(&registry, &config);
    let creditor = CreditorBuilder::new("K-5", "Papierwelt GmbH").build();

    let mut ctx = ComposeContext::new("c-1", "Papier, Toner und Ordner", day());
    ctx.supplier_name = Some("Papierwelt GmbH");
    ctx.amount = Some(dec!(80));
    let unmatched = composer.compose(&ctx).unwrap();

    ctx.creditor = Some(&creditor);
    ctx.creditor_match = Some(MatchBasis::ExactName);
    let by_name = composer.compose(&ctx).unwrap();

    ctx.creditor_match = Some(MatchBasis::TaxId);
    let by_id = composer.compose(&ctx).unwrap();

    assert!(unmatched.confidence < by_name.confidence);
    assert!(by_name.confidence < by_id.confidence);
    assert!(unmatched.explanation.contains("Creditor not identified"));
}

#[test]
fn unusual_vat_rate_is_noted_not_rejected() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let mut ctx = ComposeContext::new("v-1", "Papier, Toner und Ordner", day());
    ctx.amount = Some(dec!(116));
    ctx.vat_rate = Some(dec!(16));

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.vat_amount, Some(dec!(16.00)));
    assert!(p.explanation_fragments().any(|f| f == "Unusual VAT rate 16%"));
}

#[test]
fn stated_vat_amount_is_kept() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let mut ctx = ComposeContext::new("v-2", "Papier, Toner und Ordner", day());
    ctx.amount = Some(dec!(107));
    ctx.vat_amount = Some(dec!(7.00));

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.vat_amount, Some(dec!(7.00)));
    assert_eq!(p.vat_rate, None);
    assert!(p.explanation.contains("VAT 7.00 EUR"));
}

#[test]
fn fallback_narrative_is_truncated() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let mut ctx = ComposeContext::new("n-1", "Leistung laut Vereinbarung", day());
    ctx.supplier_name = Some("Musterfirma GmbH");
    ctx.amount = Some(dec!(500));

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.debit_account, "4900");
    assert!(p.booking_text.starts_with("Sonstige betriebliche Aufwendungen"));
    assert_eq!(p.booking_text.chars().count(), MAX_BOOKING_TEXT_LEN);
}

#[test]
fn custom_chart_without_low_value_account() {
    let csv = "code;name;type;category;keywords\n\
               0490;Betriebsausstattung;Aktiva;Anlagevermögen;laptop|monitor|computer\n\
               1600;Verbindlichkeiten;Passiva;Verbindlichkeiten;\n";
    let registry = AccountRegistry::from_csv_reader(csv.as_bytes()).unwrap();
    assert_eq!(registry.list_by_type(AccountType::Asset).len(), 1);

    let config = EngineConfig::default();
    let mut ctx = ComposeContext::new("g-1", "Laptop Monitor Computer", day());
    ctx.amount = Some(dec!(100));

    let p = BookingComposer::new(&registry, &config).compose(&ctx).unwrap();
    assert_eq!(p.debit_account, "0490");
    assert!(!p.explanation.contains("Low-value asset"));
}

#[test]
fn zero_vat_on_large_amount() {
    let registry = AccountRegistry::skr03();
    let config = EngineConfig::default();
    let composer = BookingComposer::new(&registry, &config);
    let mut ctx = ComposeContext::new("z-1", "Papier, Toner und Ordner", day());
    ctx.amount = Some(dec!(2000));
    let with_vat = {
        ctx.vat_rate = Some(dec!(19));
        composer.compose(&ctx).unwrap()
    };
    ctx.vat_rate = Some(dec!(0));
    let zero = composer.compose(&ctx).unwrap();

    assert!(zero.explanation.contains("Zero VAT"));
    assert!(zero.confidence < with_vat.confidence);
}
