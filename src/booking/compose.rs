//! Booking proposal composition.

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, error, info, warn};

use super::confidence::{ConfidenceSignals, CreditorSignal, account_strength, confidence};
use super::suggest::{AccountSuggester, ScoredAccount, SuggestionBasis};
use crate::accounts::{
    Account, AccountRegistry, CATEGORY_COMMUNICATION, CATEGORY_GOODS, CATEGORY_MAINTENANCE,
    CATEGORY_OFFICE,
};
use crate::core::{BookingProposal, Creditor, EXPLANATION_SEPARATOR, EngineConfig, Template};
use crate::creditor::MatchBasis;
use crate::extract::TemplateProfile;

/// Statutory German VAT rates, in percent.
pub const STATUTORY_VAT_RATES: [Decimal; 3] = [dec!(0), dec!(7), dec!(19)];

/// Maximum booking text length (DATEV Buchungstext).
pub const MAX_BOOKING_TEXT_LEN: usize = 60;

/// Explanation marker for proposals above the review threshold.
pub const REVIEW_MARKER: &str = "requires review";

/// Confidence bonus when a template override keyword matches.
const OVERRIDE_BOOST: u8 = 5;
/// Confidence deduction when the review flag is raised.
const REVIEW_PENALTY: u8 = 10;
/// Confidence deduction for zero VAT on a large amount.
const ZERO_VAT_PENALTY: u8 = 5;

/// Everything composition needs to know about one invoice.
#[derive(Debug, Clone)]
pub struct ComposeContext<'a> {
    /// Document identifier, for logs.
    pub document_id: &'a str,
    /// Extracted document text.
    pub text: &'a str,
    /// Extracted supplier name.
    pub supplier_name: Option<&'a str>,
    /// Extracted supplier tax id.
    pub supplier_tax_id: Option<&'a str>,
    /// Resolved or newly created creditor.
    pub creditor: Option<&'a Creditor>,
    /// How the creditor was resolved; `None` for new or missing creditors.
    pub creditor_match: Option<MatchBasis>,
    /// Gross amount.
    pub amount: Option<Decimal>,
    /// VAT amount.
    pub vat_amount: Option<Decimal>,
    /// VAT rate in percent.
    pub vat_rate: Option<Decimal>,
    /// Recognized template.
    pub template: Template,
    /// Supplier's invoice number.
    pub invoice_number: Option<&'a str>,
    /// Date the proposal is made for.
    pub booking_date: NaiveDate,
}

impl<'a> ComposeContext<'a> {
    /// A context with only text and booking date set.
    pub fn new(document_id: &'a str, text: &'a str, booking_date: NaiveDate) -> Self {
        Self {
            document_id,
            text,
            supplier_name: None,
            supplier_tax_id: None,
            creditor: None,
            creditor_match: None,
            amount: None,
            vat_amount: None,
            vat_rate: None,
            template: Template::Generic,
            invoice_number: None,
            booking_date,
        }
    }
}

/// Turns an invoice context into a [`BookingProposal`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use kontierung::accounts::AccountRegistry;
/// use kontierung::booking::{BookingComposer, ComposeContext};
/// use kontierung::core::EngineConfig;
/// use rust_decimal_macros::dec;
///
/// let registry = AccountRegistry::skr03();
/// let config = EngineConfig::default();
/// let composer = BookingComposer::new(&registry, &config);
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
/// let mut ctx = ComposeContext::new("doc-1", "Telefon und Mobilfunk April", today);
/// ctx.supplier_name = Some("Telekom Deutschland GmbH");
/// ctx.amount = Some(dec!(59.50));
/// ctx.vat_rate = Some(dec!(19));
///
/// let proposal = composer.compose(&ctx).unwrap();
/// assert_eq!(proposal.debit_account, "4920");
/// assert_eq!(proposal.credit_account, "1600");
/// assert_eq!(proposal.vat_amount, Some(dec!(9.50)));
/// ```
pub struct BookingComposer<'a> {
    registry: &'a AccountRegistry,
    config: &'a EngineConfig,
}

impl<'a> BookingComposer<'a> {
    /// A composer over `registry`.
    pub fn new(registry: &'a AccountRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Compose a proposal, or `None` when the invoice carries too little
    /// information. Internal failures are logged and also yield `None`.
    pub fn compose(&self, ctx: &ComposeContext<'_>) -> Option<BookingProposal> {
        match catch_unwind(AssertUnwindSafe(|| self.compose_inner(ctx))) {
            Ok(proposal) => proposal,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                error!(
                    document = ctx.document_id,
                    stage = "composition",
                    reason = %reason,
                    "Booking proposal composition failed"
                );
                None
            }
        }
    }

    fn compose_inner(&self, ctx: &ComposeContext<'_>) -> Option<BookingProposal> {
        let Some(amount) = ctx.amount.filter(|a| *a > Decimal::ZERO) else {
            debug!(document = ctx.document_id, "No positive amount, no proposal");
            return None;
        };

        let suggester = AccountSuggester::new(self.registry, self.config);
        let creditor_default = ctx.creditor.and_then(|c| c.default_account.as_deref());
        let Some(ScoredAccount {
            account: suggested,
            score,
            basis,
        }) = suggester.suggest_scored(ctx.text, ctx.supplier_name, ctx.template, creditor_default)
        else {
            info!(document = ctx.document_id, "No account found, pending manual booking");
            return None;
        };

        let mut fragments = vec![format!(
            "Account {} {}: {basis}",
            suggested.code, suggested.name
        )];
        fragments.push(creditor_fragment(ctx));
        if ctx.template.is_known() {
            fragments.push(format!("Template detected: {}", ctx.template.code()));
        }

        let profile = TemplateProfile::of(ctx.template);
        let mut debit = suggested;
        let mut notes: Vec<String> = Vec::new();
        let mut boost = 0u8;

        if basis != SuggestionBasis::CreditorDefault {
            if let Some((rule, keyword)) = profile.override_for(ctx.text) {
                boost = OVERRIDE_BOOST;
                if rule.account != debit.code {
                    if let Some(target) = self.registry.lookup_by_code(rule.account) {
                        notes.push(format!(
                            "Template override '{keyword}': {} -> {}",
                            debit.code, target.code
                        ));
                        debit = target.clone();
                    }
                }
            }
        }

        let credit_account = self.credit_account(ctx, amount, profile);

        let vat_rate = ctx.vat_rate;
        let vat_amount = ctx.vat_amount.or_else(|| {
            vat_rate.map(|rate| (amount * rate / (dec!(100) + rate)).round_dp(2))
        });
        if let Some(rate) = vat_rate {
            if !STATUTORY_VAT_RATES.contains(&rate) {
                warn!(
                    document = ctx.document_id,
                    rate = %rate,
                    "VAT rate is not a statutory German rate"
                );
                notes.push(format!("Unusual VAT rate {}%", rate.normalize()));
            }
        }
        fragments.push(vat_fragment(vat_amount, vat_rate));

        let signals = ConfidenceSignals {
            account: account_strength(basis, score),
            creditor: match ctx.creditor_match {
                Some(m) if m.is_identifier() => CreditorSignal::Identifier,
                Some(_) => CreditorSignal::Name,
                None => CreditorSignal::Unmatched,
            },
            template_known: ctx.template.is_known(),
            has_amount: true,
            has_vat: vat_amount.is_some() || vat_rate.is_some(),
            has_tax_id: ctx.supplier_tax_id.is_some_and(|t| !t.trim().is_empty()),
            text_long_enough: ctx.text.chars().count() >= self.config.min_text_length,
        };
        let mut score = confidence(&signals).saturating_add(boost).min(100);

        if amount <= self.config.small_amount_threshold && debit.is_capitalizable() {
            if let Some(gwg) = self.registry.lookup_by_code(&self.config.low_value_asset_account) {
                notes.push(format!(
                    "Low-value asset (<= {}): {} -> {}",
                    self.config.small_amount_threshold, debit.code, gwg.code
                ));
                debit = gwg.clone();
            }
        }

        let review_required = amount > self.config.review_threshold;
        if review_required {
            notes.push(format!(
                "{REVIEW_MARKER}: amount above {}",
                self.config.review_threshold
            ));
            score = score
                .saturating_sub(REVIEW_PENALTY)
                .min(self.config.review_confidence_cap);
        }

        let zero_vat =
            vat_rate.is_some_and(|r| r.is_zero()) || vat_amount.is_some_and(|v| v.is_zero());
        if zero_vat && amount > self.config.zero_vat_check_threshold {
            notes.push("Zero VAT on a large amount, check tax treatment".to_string());
            score = score.saturating_sub(ZERO_VAT_PENALTY);
        }
        fragments.extend(notes);

        let booking_text = booking_text(ctx, &debit, profile);
        let proposal = BookingProposal {
            debit_account: debit.code.clone(),
            credit_account,
            amount,
            vat_amount,
            vat_rate,
            creditor_id: ctx.creditor.map(|c| c.id.clone()),
            booking_text,
            booking_date: ctx.booking_date,
            confidence: score,
            review_required,
            explanation: fragments.join(EXPLANATION_SEPARATOR),
        };
        info!(
            document = ctx.document_id,
            debit = %proposal.debit_account,
            credit = %proposal.credit_account,
            confidence = proposal.confidence,
            review = proposal.review_required,
            "Booking proposal composed"
        );
        Some(proposal)
    }

    fn credit_account(
        &self,
        ctx: &ComposeContext<'_>,
        amount: Decimal,
        profile: &TemplateProfile,
    ) -> String {
        if let Some(code) = ctx
            .creditor
            .and_then(|c| c.payable_account.as_deref())
            .filter(|c| !c.trim().is_empty())
        {
            return code.trim().to_string();
        }
        if let Some(code) = profile.payable_account {
            return code.to_string();
        }
        if amount >= self.config.large_liability_threshold {
            self.config.large_liability_account.clone()
        } else {
            self.config.payables_account.clone()
        }
    }
}

fn creditor_fragment(ctx: &ComposeContext<'_>) -> String {
    match (ctx.creditor, ctx.creditor_match) {
        (Some(c), Some(basis)) => format!("Creditor {} matched by {basis}", c.id),
        (Some(c), None) => format!("Creditor {} created from invoice", c.id),
        (None, _) => "Creditor not identified".to_string(),
    }
}

fn vat_fragment(vat_amount: Option<Decimal>, vat_rate: Option<Decimal>) -> String {
    match (vat_amount, vat_rate) {
        (Some(v), Some(r)) => format!("VAT {}% = {v:.2} EUR", r.normalize()),
        (Some(v), None) => format!("VAT {v:.2} EUR"),
        (None, Some(r)) => format!("VAT {}%", r.normalize()),
        (None, None) => "No VAT stated".to_string(),
    }
}

/// Booking narrative (Buchungstext), at most [`MAX_BOOKING_TEXT_LEN`] characters.
pub fn booking_text(
    ctx: &ComposeContext<'_>,
    debit: &Account,
    profile: &TemplateProfile,
) -> String {
    let supplier = ctx
        .supplier_name
        .or(ctx.creditor.map(|c| c.name.as_str()))
        .unwrap_or("unbekannter Lieferant");

    let base = match profile.narrative {
        Some(narrative) => narrative.to_string(),
        None => match category_phrase(&debit.category) {
            Some(phrase) => format!("{phrase} {supplier}"),
            None => format!(
                "{} – {supplier} vom {}",
                debit.name,
                ctx.booking_date.format("%d.%m.%Y")
            ),
        },
    };
    let text = match ctx.invoice_number {
        Some(number) => format!("{base}, Re-Nr. {number}"),
        None => base,
    };
    text.chars().take(MAX_BOOKING_TEXT_LEN).collect()
}

fn category_phrase(category: &str) -> Option<&'static str> {
    match category {
        c if c == CATEGORY_GOODS => Some("Wareneinkauf"),
        c if c == CATEGORY_OFFICE => Some("Büromaterial"),
        c if c == CATEGORY_COMMUNICATION => Some("Telekommunikation"),
        c if c == CATEGORY_MAINTENANCE => Some("Instandhaltung"),
        _ => None,
    }
}
