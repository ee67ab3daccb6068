//! Proposal confidence as a sum of independently capped sub-scores.

use super::suggest::{KEYWORD_HIT_POINTS, SuggestionBasis};

/// Maximum points for how the debit account was found.
pub const ACCOUNT_WEIGHT: u32 = 35;
/// Maximum points for how the creditor was identified.
pub const CREDITOR_WEIGHT: u32 = 25;
/// Maximum points for a recognized template.
pub const TEMPLATE_WEIGHT: u32 = 20;
/// Maximum points for data completeness.
pub const COMPLETENESS_WEIGHT: u32 = 20;

const COMPLETENESS_ITEM_POINTS: u32 = 5;
const MAX_SCORE: u32 = ACCOUNT_WEIGHT + CREDITOR_WEIGHT + TEMPLATE_WEIGHT + COMPLETENESS_WEIGHT;

/// How strongly the creditor is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CreditorSignal {
    /// Not identified.
    #[default]
    Unmatched,
    /// Matched by name only.
    Name,
    /// Matched by tax id or IBAN.
    Identifier,
}

/// Inputs of the confidence law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceSignals {
    /// Account-match points, see [`account_strength`].
    pub account: u32,
    /// Creditor identification.
    pub creditor: CreditorSignal,
    /// A supplier-specific template was recognized.
    pub template_known: bool,
    /// A positive amount is present.
    pub has_amount: bool,
    /// A VAT amount or rate is present.
    pub has_vat: bool,
    /// A supplier tax id is present.
    pub has_tax_id: bool,
    /// The extracted text reaches the minimum length.
    pub text_long_enough: bool,
}

/// Account-match points for a suggestion.
///
/// Curated creditor defaults score highest, then template rules; the
/// keyword scan scales with its score; name rules and the fallback trail.
pub fn account_strength(basis: SuggestionBasis, score: u32) -> u32 {
    let points = match basis {
        SuggestionBasis::CreditorDefault => ACCOUNT_WEIGHT,
        SuggestionBasis::TemplateRule { .. } => 30,
        SuggestionBasis::KeywordScan { .. } => KEYWORD_HIT_POINTS + score / 2,
        SuggestionBasis::SupplierRule { .. } => 20,
        SuggestionBasis::Fallback => 8,
    };
    points.min(ACCOUNT_WEIGHT)
}

/// Confidence 0–100: achieved points over the maximum, rounded.
///
/// ```
/// use kontierung::booking::{ConfidenceSignals, CreditorSignal, confidence};
///
/// let signals = ConfidenceSignals {
///     account: 35,
///     creditor: CreditorSignal::Identifier,
///     template_known: true,
///     has_amount: true,
///     has_tax_id: true,
///     text_long_enough: true,
///     ..Default::default()
/// };
/// assert_eq!(confidence(&signals), 95);
/// ```
pub fn confidence(signals: &ConfidenceSignals) -> u8 {
    let account = signals.account.min(ACCOUNT_WEIGHT);
    let creditor = match signals.creditor {
        CreditorSignal::Identifier => CREDITOR_WEIGHT,
        CreditorSignal::Name => 12,
        CreditorSignal::Unmatched => 0,
    };
    let template = if signals.template_known {
        TEMPLATE_WEIGHT
    } else {
        0
    };
    let completeness = [
        signals.has_amount,
        signals.has_vat,
        signals.has_tax_id,
        signals.text_long_enough,
    ]
    .into_iter()
    .filter(|present| *present)
    .count() as u32
        * COMPLETENESS_ITEM_POINTS;

    let total = account + creditor + template + completeness.min(COMPLETENESS_WEIGHT);
    ((total * 100 + MAX_SCORE / 2) / MAX_SCORE) as u8
}
