//! Engine tunables: thresholds, fixed accounts, and extraction policies.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::KontierungError;

/// Which of several amounts found in a document is reported as the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// Largest amount (running totals are usually the largest figure).
    #[default]
    Maximum,
    /// Last amount in document order (totals are usually printed last).
    LastInDocument,
}

/// Which of several dates found in a document is reported as invoice date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// First date in document order.
    #[default]
    FirstInDocument,
    /// Earliest calendar date.
    Earliest,
}

/// Configuration shared by extraction, suggestion and composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gross amounts at or below this are expensed immediately (GWG).
    pub small_amount_threshold: Decimal,
    /// Gross amounts above this raise a review flag.
    pub review_threshold: Decimal,
    /// Gross amounts at or above this are credited to the large-liability account.
    pub large_liability_threshold: Decimal,
    /// Gross amounts above this with zero VAT raise a plausibility note.
    pub zero_vat_check_threshold: Decimal,
    /// Keyword scan scores at or below this are rejected.
    pub min_keyword_score: u32,
    /// Extracted text shorter than this counts as incomplete.
    pub min_text_length: usize,
    /// Standard trade payables (Verbindlichkeiten aLuL).
    pub payables_account: String,
    /// Payables account for large invoices.
    pub large_liability_account: String,
    /// Immediate-expense account for low-value assets.
    pub low_value_asset_account: String,
    /// Miscellaneous operating expense fallback.
    pub fallback_account: String,
    /// Confidence ceiling once a review flag is raised.
    pub review_confidence_cap: u8,
    /// Total amount selection policy.
    pub amount_policy: AmountPolicy,
    /// Invoice date selection policy.
    pub date_policy: DatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            small_amount_threshold: dec!(150),
            review_threshold: dec!(10000),
            large_liability_threshold: dec!(10000),
            zero_vat_check_threshold: dec!(1000),
            min_keyword_score: 20,
            min_text_length: 50,
            payables_account: "1600".into(),
            large_liability_account: "1700".into(),
            low_value_asset_account: "4855".into(),
            fallback_account: "4900".into(),
            review_confidence_cap: 75,
            amount_policy: AmountPolicy::Maximum,
            date_policy: DatePolicy::FirstInDocument,
        }
    }
}

impl EngineConfig {
    /// Parse from TOML. Missing keys keep their defaults.
    ///
    /// ```
    /// use kontierung::core::EngineConfig;
    /// use rust_decimal_macros::dec;
    ///
    /// let cfg = EngineConfig::from_toml_str("small_amount_threshold = \"250\"").unwrap();
    /// assert_eq!(cfg.small_amount_threshold, dec!(250));
    /// assert_eq!(cfg.payables_account, "1600");
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, KontierungError> {
        let config: Self =
            toml::from_str(s).map_err(|e| KontierungError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, KontierungError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KontierungError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), KontierungError> {
        if self.small_amount_threshold.is_sign_negative() {
            return Err(KontierungError::Config(
                "small_amount_threshold must not be negative".into(),
            ));
        }
        if self.review_threshold <= self.small_amount_threshold {
            return Err(KontierungError::Config(format!(
                "review_threshold {} must exceed small_amount_threshold {}",
                self.review_threshold, self.small_amount_threshold
            )));
        }
        if self.review_confidence_cap > 100 {
            return Err(KontierungError::Config(
                "review_confidence_cap must be within 0..=100".into(),
            ));
        }
        for (key, code) in [
            ("payables_account", &self.payables_account),
            ("large_liability_account", &self.large_liability_account),
            ("low_value_asset_account", &self.low_value_asset_account),
            ("fallback_account", &self.fallback_account),
        ] {
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(KontierungError::Config(format!(
                    "{key} must be a numeric account code, got '{code}'"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
///
/// # Example
///
/// ```
/// use kontierung::core::EngineConfigBuilder;
/// use rust_decimal_macros::dec;
///
/// let config = EngineConfigBuilder::new()
///     .small_amount_threshold(dec!(250))
///     .payables_account("1610")
///     .build();
/// assert_eq!(config.payables_account, "1610");
/// ```
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the immediate-expense threshold.
    pub fn small_amount_threshold(mut self, amount: Decimal) -> Self {
        self.config.small_amount_threshold = amount;
        self
    }

    /// Set the review threshold.
    pub fn review_threshold(mut self, amount: Decimal) -> Self {
        self.config.review_threshold = amount;
        self
    }

    /// Set the large-liability threshold.
    pub fn large_liability_threshold(mut self, amount: Decimal) -> Self {
        self.config.large_liability_threshold = amount;
        self
    }

    /// Set the zero-VAT plausibility threshold.
    pub fn zero_vat_check_threshold(mut self, amount: Decimal) -> Self {
        self.config.zero_vat_check_threshold = amount;
        self
    }

    /// Set the minimum accepted keyword score.
    pub fn min_keyword_score(mut self, score: u32) -> Self {
        self.config.min_keyword_score = score;
        self
    }

    /// Set the minimum text length for the completeness signal.
    pub fn min_text_length(mut self, len: usize) -> Self {
        self.config.min_text_length = len;
        self
    }

    /// Set the standard payables account.
    pub fn payables_account(mut self, code: impl Into<String>) -> Self {
        self.config.payables_account = code.into();
        self
    }

    /// Set the large-liability account.
    pub fn large_liability_account(mut self, code: impl Into<String>) -> Self {
        self.config.large_liability_account = code.into();
        self
    }

    /// Set the low-value-asset account.
    pub fn low_value_asset_account(mut self, code: impl Into<String>) -> Self {
        self.config.low_value_asset_account = code.into();
        self
    }

    /// Set the fallback expense account.
    pub fn fallback_account(mut self, code: impl Into<String>) -> Self {
        self.config.fallback_account = code.into();
        self
    }

    /// Set the confidence ceiling for flagged proposals.
    pub fn review_confidence_cap(mut self, cap: u8) -> Self {
        self.config.review_confidence_cap = cap.min(100);
        self
    }

    /// Set the total amount policy.
    pub fn amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.config.amount_policy = policy;
        self
    }

    /// Set the invoice date policy.
    pub fn date_policy(mut self, policy: DatePolicy) -> Self {
        self.config.date_policy = policy;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn toml_overrides_policies() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            amount_policy = "last_in_document"
            date_policy = "earliest"
            min_keyword_score = 30
            "#,
        )
        .unwrap();
        assert_eq!(cfg.amount_policy, AmountPolicy::LastInDocument);
        assert_eq!(cfg.date_policy, DatePolicy::Earliest);
        assert_eq!(cfg.min_keyword_score, 30);
    }

    #[test]
    fn toml_rejects_bad_account() {
        let err = EngineConfig::from_toml_str("payables_account = \"16A0\"").unwrap_err();
        assert!(err.to_string().contains("payables_account"));
    }

    #[test]
    fn toml_rejects_inverted_thresholds() {
        let err = EngineConfig::from_toml_str("review_threshold = \"100\"").unwrap_err();
        assert!(matches!(err, KontierungError::Config(_)));
    }

    #[test]
    fn toml_rejects_syntax_error() {
        assert!(EngineConfig::from_toml_str("small_amount_threshold = ").is_err());
    }

    #[test]
    fn builder_caps_confidence_ceiling() {
        let cfg = EngineConfigBuilder::new().review_confidence_cap(180).build();
        assert_eq!(cfg.review_confidence_cap, 100);
    }
}
