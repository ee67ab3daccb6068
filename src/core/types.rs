use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalize::{normalize_iban, normalize_tax_id};

/// Known supplier document layouts.
///
/// Closed set: every variant has a static profile (markers, account rules,
/// narrative) in [`crate::extract::TemplateProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Template {
    /// FAMO vehicle assembly and service invoices.
    Famo,
    /// Sonepar electrical wholesale invoices.
    Sonepar,
    /// Anything else.
    #[default]
    Generic,
}

impl Template {
    /// Templates in recognition priority order (Generic last).
    pub const ALL: [Template; 3] = [Self::Famo, Self::Sonepar, Self::Generic];

    /// Stable identifier used in logs and explanations.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Famo => "FAMO",
            Self::Sonepar => "SONEPAR",
            Self::Generic => "GENERIC",
        }
    }

    /// Parse from the identifier returned by [`Template::code`].
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "FAMO" => Some(Self::Famo),
            "SONEPAR" => Some(Self::Sonepar),
            "GENERIC" => Some(Self::Generic),
            _ => None,
        }
    }

    /// Whether this is a supplier-specific template.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Generic)
    }
}

/// Structured fields recovered from one document's text.
///
/// Every field is optional; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoiceData {
    /// Supplier (creditor) name.
    pub supplier_name: Option<String>,
    /// Supplier VAT id, normalized (e.g. "DE123456789").
    pub supplier_tax_id: Option<String>,
    /// Supplier postal address as printed.
    pub supplier_address: Option<String>,
    /// Supplier's invoice number.
    pub invoice_number: Option<String>,
    /// Invoice issue date.
    pub invoice_date: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Gross total.
    pub total_amount: Option<Decimal>,
    /// Net total.
    pub net_amount: Option<Decimal>,
    /// VAT amount.
    pub vat_amount: Option<Decimal>,
    /// VAT rate in percent (e.g. 19).
    pub vat_rate: Option<Decimal>,
    /// Supplier IBAN, normalized.
    pub iban: Option<String>,
    /// The full text the fields were extracted from.
    pub extracted_text: String,
    /// Extraction confidence, 0–100.
    pub confidence: u8,
    /// Recognized supplier template.
    pub template: Template,
}

/// A supplier the business owes money to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creditor {
    /// Directory identifier.
    pub id: String,
    /// Creditor name.
    pub name: String,
    /// VAT id, normalized.
    pub tax_id: Option<String>,
    /// IBAN, normalized.
    pub iban: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    pub country: Option<String>,
    /// Curated expense account for this creditor (overrides suggestions).
    pub default_account: Option<String>,
    /// Personal payable account (DATEV creditor range 70000–99999).
    pub payable_account: Option<String>,
    /// Payment terms in days.
    pub payment_terms_days: Option<u32>,
    /// Inactive creditors are ignored by resolution.
    pub is_active: bool,
    /// Free-text notes, e.g. provenance of auto-created records.
    pub notes: Option<String>,
}

/// Fields for a creditor about to be created in the directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCreditor {
    /// Creditor name (required).
    pub name: String,
    /// VAT id, normalized.
    pub tax_id: Option<String>,
    /// IBAN, normalized.
    pub iban: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Provenance note.
    pub notes: Option<String>,
}

/// Builder for [`Creditor`].
///
/// Identifiers are normalized on the way in.
///
/// # Example
///
/// ```
/// use kontierung::core::CreditorBuilder;
///
/// let famo = CreditorBuilder::new("K-0001", "FAMO GmbH")
///     .tax_id("DE 123 456 789")
///     .default_account("4400")
///     .build();
/// assert_eq!(famo.tax_id.as_deref(), Some("DE123456789"));
/// assert!(famo.is_active);
/// ```
pub struct CreditorBuilder {
    creditor: Creditor,
}

impl CreditorBuilder {
    /// Create a builder for an active creditor.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            creditor: Creditor {
                id: id.into(),
                name: name.into(),
                tax_id: None,
                iban: None,
                address: None,
                city: None,
                zip_code: None,
                country: None,
                default_account: None,
                payable_account: None,
                payment_terms_days: None,
                is_active: true,
                notes: None,
            },
        }
    }

    /// Set the VAT id.
    pub fn tax_id(mut self, tax_id: &str) -> Self {
        self.creditor.tax_id = Some(normalize_tax_id(tax_id));
        self
    }

    /// Set the IBAN.
    pub fn iban(mut self, iban: &str) -> Self {
        self.creditor.iban = Some(normalize_iban(iban));
        self
    }

    /// Set street, postal code, city and country.
    pub fn address(
        mut self,
        street: impl Into<String>,
        zip_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.creditor.address = Some(street.into());
        self.creditor.zip_code = Some(zip_code.into());
        self.creditor.city = Some(city.into());
        self.creditor.country = Some(country.into());
        self
    }

    /// Set the curated expense account.
    pub fn default_account(mut self, code: impl Into<String>) -> Self {
        self.creditor.default_account = Some(code.into());
        self
    }

    /// Set the personal payable account.
    pub fn payable_account(mut self, code: impl Into<String>) -> Self {
        self.creditor.payable_account = Some(code.into());
        self
    }

    /// Set payment terms in days.
    pub fn payment_terms_days(mut self, days: u32) -> Self {
        self.creditor.payment_terms_days = Some(days);
        self
    }

    /// Mark active or inactive.
    pub fn active(mut self, active: bool) -> Self {
        self.creditor.is_active = active;
        self
    }

    /// Set notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.creditor.notes = Some(notes.into());
        self
    }

    /// Build the creditor.
    pub fn build(self) -> Creditor {
        self.creditor
    }
}

/// A suggested double-entry record awaiting confirmation.
///
/// Field names follow the surrounding bookkeeping vocabulary
/// (debit/credit account, booking date/text, VAT rate/amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingProposal {
    /// Expense (Soll) account code.
    pub debit_account: String,
    /// Payable (Haben) account code.
    pub credit_account: String,
    /// Gross amount.
    pub amount: Decimal,
    /// VAT amount, given or back-calculated.
    pub vat_amount: Option<Decimal>,
    /// VAT rate in percent.
    pub vat_rate: Option<Decimal>,
    /// Resolved creditor.
    pub creditor_id: Option<String>,
    /// Booking narrative (Buchungstext).
    pub booking_text: String,
    /// Date the proposal was made for.
    pub booking_date: NaiveDate,
    /// Proposal confidence, 0–100.
    pub confidence: u8,
    /// Whether a review flag was raised.
    pub review_required: bool,
    /// Rationale fragments joined with [`EXPLANATION_SEPARATOR`].
    pub explanation: String,
}

/// Separator between rationale fragments in [`BookingProposal::explanation`].
pub const EXPLANATION_SEPARATOR: &str = " | ";

impl BookingProposal {
    /// Individual rationale fragments.
    pub fn explanation_fragments(&self) -> impl Iterator<Item = &str> {
        self.explanation.split(EXPLANATION_SEPARATOR)
    }
}
