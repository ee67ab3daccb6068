//! Supplier template recognition and template-specific refinement.
//!
//! Templates form a closed set ([`Template`]); each has one static
//! [`TemplateProfile`] row carrying everything later stages need: brand
//! markers, refinement patterns, account rules, payable account, narrative.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::patterns::{ADDRESS, LEGAL_ENTITY};
use crate::accounts::{CATEGORY_GOODS, CATEGORY_VEHICLES};
use crate::core::Template;

/// Lines scanned for a company name by the generic heuristic.
const SUPPLIER_SCAN_LINES: usize = 10;

/// Company names longer than this keep only their trailing words.
const MAX_SUPPLIER_NAME_LEN: usize = 60;

/// Text keywords mapped to one account code.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    /// Lower-case keywords; any one triggers the rule.
    pub keywords: &'static [&'static str],
    /// Target account code.
    pub account: &'static str,
}

impl KeywordRule {
    /// First keyword contained in the lower-cased `haystack`.
    pub fn matched_keyword(&self, haystack: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|k| haystack.contains(k))
    }
}

/// Static description of one supplier template.
#[derive(Debug)]
pub struct TemplateProfile {
    /// The template this profile describes.
    pub template: Template,
    /// Upper-case brand markers; any one identifies the template.
    pub markers: &'static [&'static str],
    /// Typical account category, for the keyword-scan bonus.
    pub category: Option<&'static str>,
    /// Keyword rules used when suggesting the debit account.
    pub account_rules: &'static [KeywordRule],
    /// Reclassification rules applied after composition.
    pub overrides: &'static [KeywordRule],
    /// Payable account for this supplier, if it has its own.
    pub payable_account: Option<&'static str>,
    /// Booking narrative prefix.
    pub narrative: Option<&'static str>,
    supplier_pattern: Option<&'static str>,
    fixed_supplier_name: Option<&'static str>,
    invoice_number_pattern: Option<&'static str>,
}

static FAMO: TemplateProfile = TemplateProfile {
    template: Template::Famo,
    markers: &["FAMO", "FAHRZEUG-MONTAGE"],
    category: Some(CATEGORY_VEHICLES),
    account_rules: &[
        KeywordRule {
            keywords: &["wartung", "inspektion", "reparatur", "instandsetzung", "reifen"],
            account: "4540",
        },
        KeywordRule {
            keywords: &["diesel", "kraftstoff", "adblue"],
            account: "4530",
        },
    ],
    overrides: &[KeywordRule {
        keywords: &["hauptuntersuchung", "inspektion"],
        account: "4540",
    }],
    payable_account: None,
    narrative: Some("Kfz-Service FAMO"),
    supplier_pattern: Some(r"(?i)\bFAMO\s+GmbH\b"),
    fixed_supplier_name: Some("FAMO GmbH"),
    invoice_number_pattern: Some(r"(?i)Rechnung\s+Nr\.?\s*([RF]{1,2}\d{6,8})\b"),
};

static SONEPAR: TemplateProfile = TemplateProfile {
    template: Template::Sonepar,
    markers: &["SONEPAR", "ELEKTRO-GROSSHANDEL", "ELEKTROHANDEL"],
    category: Some(CATEGORY_GOODS),
    account_rules: &[
        KeywordRule {
            keywords: &["werkzeug", "messgerät", "zange"],
            account: "4985",
        },
        KeywordRule {
            keywords: &[
                "kabel",
                "leitung",
                "schalter",
                "steckdose",
                "leuchte",
                "installationsmaterial",
            ],
            account: "3400",
        },
    ],
    overrides: &[KeywordRule {
        keywords: &["werkzeug", "messgerät"],
        account: "4985",
    }],
    payable_account: Some("70010"),
    narrative: Some("Elektromaterial Sonepar"),
    supplier_pattern: Some(r"\bSonepar\s+[A-ZÄÖÜ][a-zäöüß]+"),
    fixed_supplier_name: None,
    invoice_number_pattern: Some(r"\bRE\s*-\s*(\d{8,10})\b"),
};

static GENERIC: TemplateProfile = TemplateProfile {
    template: Template::Generic,
    markers: &[],
    category: None,
    account_rules: &[],
    overrides: &[],
    payable_account: None,
    narrative: None,
    supplier_pattern: None,
    fixed_supplier_name: None,
    invoice_number_pattern: None,
};

struct CompiledRefiner {
    supplier: Option<Regex>,
    invoice_number: Option<Regex>,
}

impl CompiledRefiner {
    fn new(profile: &TemplateProfile) -> Self {
        let compile = |p: &str| Regex::new(p).expect("built-in pattern must compile");
        Self {
            supplier: profile.supplier_pattern.map(compile),
            invoice_number: profile.invoice_number_pattern.map(compile),
        }
    }
}

static FAMO_REFINER: LazyLock<CompiledRefiner> = LazyLock::new(|| CompiledRefiner::new(&FAMO));
static SONEPAR_REFINER: LazyLock<CompiledRefiner> =
    LazyLock::new(|| CompiledRefiner::new(&SONEPAR));
static GENERIC_REFINER: LazyLock<CompiledRefiner> =
    LazyLock::new(|| CompiledRefiner::new(&GENERIC));

impl TemplateProfile {
    /// The profile of `template`.
    pub fn of(template: Template) -> &'static TemplateProfile {
        match template {
            Template::Famo => &FAMO,
            Template::Sonepar => &SONEPAR,
            Template::Generic => &GENERIC,
        }
    }

    fn refiner(&self) -> &'static CompiledRefiner {
        match self.template {
            Template::Famo => &FAMO_REFINER,
            Template::Sonepar => &SONEPAR_REFINER,
            Template::Generic => &GENERIC_REFINER,
        }
    }

    /// First account rule triggered by `text` (matched case-insensitively).
    pub fn account_rule_for(&self, text: &str) -> Option<(&'static KeywordRule, &'static str)> {
        first_rule(self.account_rules, text)
    }

    /// First override rule triggered by `text` (matched case-insensitively).
    pub fn override_for(&self, text: &str) -> Option<(&'static KeywordRule, &'static str)> {
        first_rule(self.overrides, text)
    }
}

fn first_rule(
    rules: &'static [KeywordRule],
    text: &str,
) -> Option<(&'static KeywordRule, &'static str)> {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find_map(|rule| rule.matched_keyword(&lower).map(|kw| (rule, kw)))
}

/// Fields a template refiner recovered; `Some` values override generic extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    /// Supplier name.
    pub supplier_name: Option<String>,
    /// Supplier address as printed.
    pub supplier_address: Option<String>,
    /// Template-specific invoice number.
    pub invoice_number: Option<String>,
}

/// Classify `text` by brand markers in priority order; no marker → Generic.
///
/// ```
/// use kontierung::core::Template;
/// use kontierung::extract::recognize_template;
///
/// assert_eq!(recognize_template("Sonepar Deutschland GmbH"), Template::Sonepar);
/// assert_eq!(recognize_template("Elektro-Großhandel Nord"), Template::Sonepar);
/// assert_eq!(recognize_template("Bäckerei Schmidt"), Template::Generic);
/// ```
pub fn recognize_template(text: &str) -> Template {
    let upper = text.to_uppercase();
    let template = Template::ALL
        .into_iter()
        .map(TemplateProfile::of)
        .find(|p| p.markers.iter().any(|m| upper.contains(m)))
        .map(|p| p.template)
        .unwrap_or(Template::Generic);
    debug!(template = template.code(), "Template recognized");
    template
}

/// Run the template's refiner over `text`.
///
/// Every template falls back to the legal-entity heuristic for the supplier
/// name when its own patterns find none.
pub fn refine(template: Template, text: &str) -> TemplateFields {
    let profile = TemplateProfile::of(template);
    let refiner = profile.refiner();

    let supplier_name = refiner
        .supplier
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| {
            profile
                .fixed_supplier_name
                .map(str::to_string)
                .unwrap_or_else(|| m.as_str().trim().to_string())
        })
        .or_else(|| legal_entity_name(text));

    let invoice_number = refiner
        .invoice_number
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    TemplateFields {
        supplier_name,
        supplier_address: supplier_address(text),
        invoice_number,
    }
}

/// Company name from the first lines that carry a legal-form suffix
/// (GmbH, AG, KG, UG, OHG, e.K.).
///
/// ```
/// use kontierung::extract::legal_entity_name;
///
/// let text = "\nMusterfirma GmbH\nHauptstraße 1\n10115 Berlin";
/// assert_eq!(legal_entity_name(text).as_deref(), Some("Musterfirma GmbH"));
/// ```
pub fn legal_entity_name(text: &str) -> Option<String> {
    text.lines()
        .take(SUPPLIER_SCAN_LINES)
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| {
            let caps = LEGAL_ENTITY.captures(line)?;
            let name = caps.get(1)?.as_str().trim();
            Some(shorten_name(name))
        })
}

fn shorten_name(name: &str) -> String {
    if name.chars().count() <= MAX_SUPPLIER_NAME_LEN {
        return name.to_string();
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    let keep = words.len().min(4);
    words[words.len() - keep..].join(" ")
}

/// First "street no, zip city" block in the text.
pub fn supplier_address(text: &str) -> Option<String> {
    ADDRESS
        .captures(text)
        .map(|caps| format!("{}, {} {}", caps[1].trim(), &caps[2], &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn famo_by_brand() {
        assert_eq!(recognize_template("FAMO GmbH\nRechnung"), Template::Famo);
        assert_eq!(recognize_template("fahrzeug-montage nord"), Template::Famo);
    }

    #[test]
    fn famo_has_priority_over_sonepar() {
        assert_eq!(
            recognize_template("Sonepar Lieferung an FAMO Werkstatt"),
            Template::Famo
        );
    }

    #[test]
    fn famo_refiner() {
        let fields = refine(Template::Famo, "FAMO GmbH Rechnung Nr. RF12345678 Betrag");
        assert_eq!(fields.supplier_name.as_deref(), Some("FAMO GmbH"));
        assert_eq!(fields.invoice_number.as_deref(), Some("RF12345678"));
    }

    #[test]
    fn famo_refiner_without_brand_line() {
        let fields = refine(Template::Famo, "Fahrzeug-Montage Nord KG\nAuftrag 12");
        assert_eq!(fields.supplier_name.as_deref(), Some("Fahrzeug-Montage Nord KG"));
        assert_eq!(fields.invoice_number, None);
    }

    #[test]
    fn sonepar_refiner() {
        let fields = refine(Template::Sonepar, "Sonepar Deutschland\nRE-123456789\nKabel NYM");
        assert_eq!(fields.supplier_name.as_deref(), Some("Sonepar Deutschland"));
        assert_eq!(fields.invoice_number.as_deref(), Some("123456789"));
    }

    #[test]
    fn generic_takes_first_company_line() {
        let text = "Rechnung\nMüller Elektro e.K.\nMusterfirma GmbH";
        assert_eq!(
            refine(Template::Generic, text).supplier_name.as_deref(),
            Some("Müller Elektro e.K.")
        );
    }

    #[test]
    fn generic_keeps_co_kg() {
        assert_eq!(
            legal_entity_name("Schmidt GmbH & Co. KG").as_deref(),
            Some("Schmidt GmbH & Co. KG")
        );
    }

    #[test]
    fn generic_cuts_after_suffix() {
        assert_eq!(
            legal_entity_name("Musterfirma GmbH    Seite 1").as_deref(),
            Some("Musterfirma GmbH")
        );
    }

    #[test]
    fn generic_ignores_words_containing_ag() {
        assert_eq!(legal_entity_name("Tagesrapport\nVertrag"), None);
    }

    #[test]
    fn generic_only_scans_header() {
        let mut text = "x\n".repeat(SUPPLIER_SCAN_LINES);
        text.push_str("Spät GmbH");
        assert_eq!(legal_entity_name(&text), None);
    }

    #[test]
    fn long_company_line_shortened() {
        let line = "Rechnungsempfänger ist laut Vertrag vom letzten Jahr die Nord Süd Bau GmbH";
        assert_eq!(legal_entity_name(line).as_deref(), Some("Nord Süd Bau GmbH"));
    }

    #[test]
    fn address_block() {
        assert_eq!(
            supplier_address("FAMO GmbH\nMusterstraße 12, 10115 Berlin").as_deref(),
            Some("Musterstraße 12, 10115 Berlin")
        );
    }

    #[test]
    fn account_rule_lookup_is_case_insensitive() {
        let (rule, kw) = TemplateProfile::of(Template::Famo)
            .account_rule_for("WARTUNG laut Plan")
            .unwrap();
        assert_eq!(rule.account, "4540");
        assert_eq!(kw, "wartung");
        assert!(TemplateProfile::of(Template::Generic).account_rule_for("wartung").is_none());
    }
}
