use chrono::NaiveDate;
use kontierung::accounts::{AccountRegistry, AccountType};
use kontierung::booking::{BookingComposer, ComposeContext};
use kontierung::core::EngineConfig;
use rust_decimal_macros::dec;

const CHART: &str = "\
code;name;type;category;keywords
# Handwerksbetrieb, reduzierter Kontenrahmen
0490;Betriebs- und Geschäftsausstattung;Aktiva;Anlagevermögen;computer|laptop|monitor
1600;Verbindlichkeiten aus Lieferungen und Leistungen;Passiva;Verbindlichkeiten;
1610;Verbindlichkeiten Großhandel;Passiva;Verbindlichkeiten;
3400;Wareneingang 19% Vorsteuer;Aufwand;Wareneinkauf;material|kabel|rohr|fitting
4855;Sofortabschreibung GWG;Aufwand;Abschreibungen;gwg
4900;Sonstige betriebliche Aufwendungen;Aufwand;Sonstiges;
";

const CONFIG: &str = r#"
small_amount_threshold = "250"
review_threshold = "5000"
payables_account = "1610"
min_keyword_score = 10
"#;

fn main() {
    let registry = AccountRegistry::from_csv_reader(CHART.as_bytes()).expect("chart should parse");
    let config = EngineConfig::from_toml_str(CONFIG).expect("config should parse");

    println!("=== Chart ===");
    for account in registry.iter() {
        println!(
            "{:>5}  {:<8} {}",
            account.code,
            account.account_type.german(),
            account.name
        );
    }
    println!("Assets: {}", registry.list_by_type(AccountType::Asset).len());

    let composer = BookingComposer::new(&registry, &config);
    let today = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

    let cases = [
        ("Kupferrohr 15mm, Fitting Messing", "Haustechnik Nord GmbH", dec!(612.40)),
        ("Laptop 14 Zoll", "Computerhaus GmbH", dec!(239.00)),
        ("Wartungsvertrag Heizung", "Kesselbau GmbH", dec!(7800.00)),
    ];

    println!("\n=== Proposals ===");
    for (i, (text, supplier, amount)) in cases.into_iter().enumerate() {
        let id = format!("demo-{i}");
        let mut ctx = ComposeContext::new(&id, text, today);
        ctx.supplier_name = Some(supplier);
        ctx.amount = Some(amount);
        ctx.vat_rate = Some(dec!(19));

        match composer.compose(&ctx) {
            Some(p) => println!(
                "{supplier:<24} {} an {}  {amount:>9} EUR  {:>3}%{}",
                p.debit_account,
                p.credit_account,
                p.confidence,
                if p.review_required { "  [review]" } else { "" }
            ),
            None => println!("{supplier:<24} no proposal"),
        }
    }
}
