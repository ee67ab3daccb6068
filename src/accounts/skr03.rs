//! Embedded SKR03 (Standardkontenrahmen 03) subset.

use super::registry::AccountType;

/// Static chart entry, converted into an owned [`super::Account`] when the
/// registry is built.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChartEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}

/// Goods purchase.
pub const CATEGORY_GOODS: &str = "Wareneinkauf";
/// Office supplies.
pub const CATEGORY_OFFICE: &str = "Büro";
/// Repairs and maintenance.
pub const CATEGORY_MAINTENANCE: &str = "Instandhaltung";
/// Telephone, postage, internet.
pub const CATEGORY_COMMUNICATION: &str = "Kommunikation";
/// Vehicle costs.
pub const CATEGORY_VEHICLES: &str = "Fahrzeuge";
/// Fixed assets eligible for capitalization.
pub const CATEGORY_FIXED_ASSETS: &str = "Anlagevermögen";

/// Categories that receive the popularity bonus in keyword scoring.
pub const POPULAR_CATEGORIES: &[&str] = &[CATEGORY_GOODS, CATEGORY_OFFICE, CATEGORY_MAINTENANCE];

use AccountType::{Asset, Expense, Liability, Revenue};

/// Iteration order is the keyword-scan tie-break order.
pub(crate) const SKR03_CHART: &[ChartEntry] = &[
    // Anlagevermögen
    ChartEntry {
        code: "0210",
        name: "Maschinen",
        account_type: Asset,
        category: CATEGORY_FIXED_ASSETS,
        keywords: &["maschine", "anlage", "fräse", "drehbank"],
    },
    ChartEntry {
        code: "0320",
        name: "Pkw",
        account_type: Asset,
        category: CATEGORY_FIXED_ASSETS,
        keywords: &["pkw", "neuwagen", "fahrzeugkauf", "kaufvertrag"],
    },
    ChartEntry {
        code: "0410",
        name: "Geschäftsausstattung",
        account_type: Asset,
        category: CATEGORY_FIXED_ASSETS,
        keywords: &["möbel", "schreibtisch", "regal", "bürostuhl", "ausstattung"],
    },
    ChartEntry {
        code: "0490",
        name: "Sonstige Betriebs- und Geschäftsausstattung",
        account_type: Asset,
        category: CATEGORY_FIXED_ASSETS,
        keywords: &["computer", "laptop", "notebook", "monitor", "drucker", "hardware"],
    },
    // Finanzmittel und Vorsteuer
    ChartEntry {
        code: "1000",
        name: "Kasse",
        account_type: Asset,
        category: "Finanzmittel",
        keywords: &["barzahlung", "kasse"],
    },
    ChartEntry {
        code: "1200",
        name: "Bank",
        account_type: Asset,
        category: "Finanzmittel",
        keywords: &["bankkonto", "kontoauszug"],
    },
    ChartEntry {
        code: "1571",
        name: "Abziehbare Vorsteuer 7%",
        account_type: Asset,
        category: "Vorsteuer",
        keywords: &[],
    },
    ChartEntry {
        code: "1576",
        name: "Abziehbare Vorsteuer 19%",
        account_type: Asset,
        category: "Vorsteuer",
        keywords: &[],
    },
    // Verbindlichkeiten
    ChartEntry {
        code: "1600",
        name: "Verbindlichkeiten aus Lieferungen und Leistungen",
        account_type: Liability,
        category: "Verbindlichkeiten",
        keywords: &[],
    },
    ChartEntry {
        code: "1700",
        name: "Sonstige Verbindlichkeiten",
        account_type: Liability,
        category: "Verbindlichkeiten",
        keywords: &[],
    },
    // Zinsen
    ChartEntry {
        code: "2100",
        name: "Zinsen und ähnliche Aufwendungen",
        account_type: Expense,
        category: "Finanzierung",
        keywords: &["zinsen", "kredit", "darlehen", "finanzierung"],
    },
    // Wareneingang
    ChartEntry {
        code: "3200",
        name: "Wareneingang",
        account_type: Expense,
        category: CATEGORY_GOODS,
        keywords: &["waren", "wareneingang", "einkauf", "material", "rohstoffe"],
    },
    ChartEntry {
        code: "3400",
        name: "Wareneingang 19% Vorsteuer",
        account_type: Expense,
        category: CATEGORY_GOODS,
        keywords: &[
            "kabel",
            "leitung",
            "elektromaterial",
            "installationsmaterial",
            "schalter",
            "steckdose",
            "leuchte",
        ],
    },
    // Personal
    ChartEntry {
        code: "4120",
        name: "Gehälter",
        account_type: Expense,
        category: "Personal",
        keywords: &["lohn", "gehalt", "personal", "mitarbeiter"],
    },
    ChartEntry {
        code: "4130",
        name: "Gesetzliche soziale Aufwendungen",
        account_type: Expense,
        category: "Personal",
        keywords: &["sozialversicherung", "krankenkasse", "rentenversicherung"],
    },
    // Raumkosten
    ChartEntry {
        code: "4210",
        name: "Miete",
        account_type: Expense,
        category: "Raumkosten",
        keywords: &["miete", "büromiete", "raummiete", "pacht"],
    },
    ChartEntry {
        code: "4240",
        name: "Gas, Strom, Wasser",
        account_type: Expense,
        category: "Raumkosten",
        keywords: &["strom", "gas", "wasser", "energie", "stadtwerke"],
    },
    // Steuern, Versicherungen, Beiträge
    ChartEntry {
        code: "4320",
        name: "Gewerbesteuer",
        account_type: Expense,
        category: "Steuern",
        keywords: &["gewerbesteuer", "hebesatz", "steuermessbetrag"],
    },
    ChartEntry {
        code: "4340",
        name: "Sonstige Steuern",
        account_type: Expense,
        category: "Steuern",
        keywords: &["kfz-steuer", "grundsteuer", "steuerbescheid"],
    },
    ChartEntry {
        code: "4360",
        name: "Versicherungen",
        account_type: Expense,
        category: "Versicherungen",
        keywords: &["versicherung", "haftpflicht", "betriebshaftpflicht", "police"],
    },
    ChartEntry {
        code: "4380",
        name: "Beiträge",
        account_type: Expense,
        category: "Beiträge",
        keywords: &["beitrag", "mitgliedsbeitrag", "kammer", "ihk", "handwerkskammer"],
    },
    // Fahrzeugkosten
    ChartEntry {
        code: "4500",
        name: "Fahrzeugkosten",
        account_type: Expense,
        category: CATEGORY_VEHICLES,
        keywords: &["auto", "fahrzeug", "kfz"],
    },
    ChartEntry {
        code: "4530",
        name: "Laufende Kfz-Betriebskosten",
        account_type: Expense,
        category: CATEGORY_VEHICLES,
        keywords: &["benzin", "diesel", "tankstelle", "kraftstoff", "tanken"],
    },
    ChartEntry {
        code: "4540",
        name: "Kfz-Reparaturen",
        account_type: Expense,
        category: CATEGORY_VEHICLES,
        keywords: &["werkstatt", "inspektion", "reifen", "ölwechsel", "hauptuntersuchung"],
    },
    // Werbe- und Reisekosten
    ChartEntry {
        code: "4600",
        name: "Werbekosten",
        account_type: Expense,
        category: "Marketing",
        keywords: &["werbung", "marketing", "anzeige", "promotion", "flyer"],
    },
    ChartEntry {
        code: "4650",
        name: "Bewirtungskosten",
        account_type: Expense,
        category: "Bewirtung",
        keywords: &["bewirtung", "restaurant", "speisen", "getränke"],
    },
    ChartEntry {
        code: "4670",
        name: "Reisekosten Unternehmer",
        account_type: Expense,
        category: "Reisekosten",
        keywords: &["reise", "hotel", "übernachtung", "verpflegung", "bahn", "flug"],
    },
    // Instandhaltung
    ChartEntry {
        code: "4800",
        name: "Reparaturen und Instandhaltung von technischen Anlagen und Maschinen",
        account_type: Expense,
        category: CATEGORY_MAINTENANCE,
        keywords: &["reparatur", "instandhaltung", "wartung", "instandsetzung", "montage"],
    },
    ChartEntry {
        code: "4806",
        name: "Wartungskosten für Hard- und Software",
        account_type: Expense,
        category: CATEGORY_MAINTENANCE,
        keywords: &["softwarewartung", "support", "update", "lizenz", "wartungsvertrag"],
    },
    // Abschreibungen
    ChartEntry {
        code: "4830",
        name: "Abschreibungen auf Sachanlagen",
        account_type: Expense,
        category: "Abschreibungen",
        keywords: &["abschreibung", "afa"],
    },
    ChartEntry {
        code: "4855",
        name: "Sofortabschreibung geringwertiger Wirtschaftsgüter",
        account_type: Expense,
        category: "Abschreibungen",
        keywords: &["gwg", "geringwertig"],
    },
    // Verschiedene betriebliche Aufwendungen
    ChartEntry {
        code: "4900",
        name: "Sonstige betriebliche Aufwendungen",
        account_type: Expense,
        category: "Sonstiges",
        keywords: &[],
    },
    ChartEntry {
        code: "4910",
        name: "Porto",
        account_type: Expense,
        category: CATEGORY_COMMUNICATION,
        keywords: &["porto", "briefmarke", "versand", "paket", "sendung"],
    },
    ChartEntry {
        code: "4920",
        name: "Telefon",
        account_type: Expense,
        category: CATEGORY_COMMUNICATION,
        keywords: &["telefon", "handy", "smartphone", "mobilfunk", "festnetz"],
    },
    ChartEntry {
        code: "4925",
        name: "Internetkosten",
        account_type: Expense,
        category: CATEGORY_COMMUNICATION,
        keywords: &["internet", "dsl", "hosting", "domain", "server", "webspace"],
    },
    ChartEntry {
        code: "4930",
        name: "Bürobedarf",
        account_type: Expense,
        category: CATEGORY_OFFICE,
        keywords: &["büro", "papier", "stifte", "ordner", "büromaterial", "toner"],
    },
    ChartEntry {
        code: "4940",
        name: "Zeitschriften, Bücher",
        account_type: Expense,
        category: "Fortbildung",
        keywords: &["buch", "zeitschrift", "fachbuch", "literatur", "abonnement"],
    },
    ChartEntry {
        code: "4945",
        name: "Fortbildungskosten",
        account_type: Expense,
        category: "Fortbildung",
        keywords: &["fortbildung", "schulung", "seminar", "kurs", "weiterbildung"],
    },
    ChartEntry {
        code: "4950",
        name: "Rechts- und Beratungskosten",
        account_type: Expense,
        category: "Beratung",
        keywords: &["anwalt", "rechtsanwalt", "beratung", "notar", "kanzlei"],
    },
    ChartEntry {
        code: "4955",
        name: "Buchführungskosten",
        account_type: Expense,
        category: "Buchhaltung",
        keywords: &["buchhaltung", "buchführung", "steuerberater", "datev", "lohnabrechnung"],
    },
    ChartEntry {
        code: "4970",
        name: "Nebenkosten des Geldverkehrs",
        account_type: Expense,
        category: "Finanzierung",
        keywords: &["bankgebühren", "kontoführung", "überweisungsgebühren"],
    },
    ChartEntry {
        code: "4985",
        name: "Werkzeuge und Kleingeräte",
        account_type: Expense,
        category: "Werkzeuge",
        keywords: &["werkzeug", "kleingerät", "bohrmaschine", "messgerät", "zange"],
    },
    // Umsatzerlöse
    ChartEntry {
        code: "8300",
        name: "Erlöse 7% USt",
        account_type: Revenue,
        category: "Umsatzerlöse",
        keywords: &["erlös", "verkauf", "ermäßigt"],
    },
    ChartEntry {
        code: "8400",
        name: "Erlöse 19% USt",
        account_type: Revenue,
        category: "Umsatzerlöse",
        keywords: &["umsatz", "erlös", "verkauf", "honorar"],
    },
];
