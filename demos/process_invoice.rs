use std::path::PathBuf;

use kontierung::accounts::AccountRegistry;
use kontierung::core::*;
use kontierung::creditor::InMemoryDirectory;
use kontierung::extract::DocumentTextSource;
use kontierung::pipeline::InvoiceProcessor;
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "FAMO GmbH
Fahrzeug-Montage, Industriestraße 7, 26135 Oldenburg
USt-IdNr.: DE 123 456 789
Rechnung Nr. RF20240311
Rechnungsdatum: 11.03.2024
Inspektion und Reparatur Bremsanlage
Nettobetrag 1.000,00 EUR
19% MwSt 190,00 EUR
Gesamtbetrag 1.190,00 EUR
IBAN: DE89 3704 0044 0532 0130 00";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kontierung=info")),
        )
        .with_target(false)
        .init();

    let registry = AccountRegistry::skr03();
    let directory = InMemoryDirectory::with_creditors(vec![
        CreditorBuilder::new("K00001", "FAMO GmbH")
            .tax_id("DE123456789")
            .payment_terms_days(14)
            .build(),
    ]);
    let processor = InvoiceProcessor::new(&registry, &directory, EngineConfig::default());

    // Process a file when one is given, the built-in sample otherwise
    let doc = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => processor
            .process_file("cli", &path, &DocumentTextSource::new())
            .expect("document should be processable"),
        None => processor
            .process_text("sample", SAMPLE)
            .expect("sample should be processable"),
    };

    println!("=== Extraction ===");
    let data = &doc.extracted;
    println!("Template:        {}", data.template.code());
    println!("Supplier:        {}", data.supplier_name.as_deref().unwrap_or("-"));
    println!("Tax id:          {}", data.supplier_tax_id.as_deref().unwrap_or("-"));
    println!("Invoice number:  {}", data.invoice_number.as_deref().unwrap_or("-"));
    if let Some(total) = data.total_amount {
        println!("Total:           {total} EUR");
    }
    if let Some(due) = data.due_date {
        println!("Due:             {}", due.format("%d.%m.%Y"));
    }
    println!("Confidence:      {}%", data.confidence);

    println!("\n=== Steps ===");
    for step in &doc.steps {
        println!("  {step}");
    }

    println!("\n=== Booking Proposal ===");
    match &doc.proposal {
        Some(p) => {
            println!("Soll {} an Haben {}: {} EUR", p.debit_account, p.credit_account, p.amount);
            if let Some(vat) = p.vat_amount {
                println!("Vorsteuer:       {vat} EUR");
            }
            println!("Buchungstext:    {}", p.booking_text);
            println!("Confidence:      {}%", p.confidence);
            if p.review_required {
                println!("Review required");
            }
            for fragment in p.explanation_fragments() {
                println!("  - {fragment}");
            }
        }
        None => println!("No proposal, pending manual booking"),
    }
}
