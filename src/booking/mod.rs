//! Account suggestion and booking proposal composition.
//!
//! [`AccountSuggester`] picks the debit account; [`BookingComposer`] turns
//! an invoice context into a [`crate::core::BookingProposal`] with credit
//! account, VAT, narrative, confidence, and business-rule adjustments.
//! Both return `None` rather than guessing: the system never books to a
//! placeholder account.

mod compose;
mod confidence;
mod suggest;

pub use compose::{
    BookingComposer, ComposeContext, MAX_BOOKING_TEXT_LEN, REVIEW_MARKER, STATUTORY_VAT_RATES,
    booking_text,
};
pub use confidence::{
    ACCOUNT_WEIGHT, COMPLETENESS_WEIGHT, CREDITOR_WEIGHT, ConfidenceSignals, CreditorSignal,
    TEMPLATE_WEIGHT, account_strength, confidence,
};
pub use suggest::{
    AccountSuggester, KEYWORD_HIT_POINTS, POPULAR_CATEGORY_BONUS, ScoredAccount,
    SuggestionBasis, TEMPLATE_CATEGORY_BONUS,
};
