//! Debit account suggestion.
//!
//! Rules are tried in a fixed order and the first one that yields an
//! account wins:
//!
//! 1. the creditor's curated default account,
//! 2. the recognized template's keyword rules,
//! 3. a weighted keyword scan across the whole chart,
//! 4. supplier-name business rules, then the fallback expense account.

use std::fmt;

use tracing::{debug, warn};

use crate::accounts::{Account, AccountRegistry, AccountType, POPULAR_CATEGORIES};
use crate::core::{EngineConfig, Template, normalize_name};
use crate::extract::TemplateProfile;

/// Points per keyword hit in the chart scan.
pub const KEYWORD_HIT_POINTS: u32 = 10;
/// Bonus when the account's category is the template's typical category.
pub const TEMPLATE_CATEGORY_BONUS: u32 = 20;
/// Bonus for commonly booked categories.
pub const POPULAR_CATEGORY_BONUS: u32 = 5;

const CREDITOR_DEFAULT_SCORE: u32 = 100;
const TEMPLATE_RULE_SCORE: u32 = 50;
const SUPPLIER_RULE_SCORE: u32 = 15;
const FALLBACK_SCORE: u32 = 5;

/// Supplier-name substrings mapped to a fixed account.
struct SupplierRule {
    needles: &'static [&'static str],
    account: &'static str,
    label: &'static str,
}

/// Matched against the lower-cased supplier name padded with spaces, so
/// short needles carry their own word boundaries.
const SUPPLIER_RULES: &[SupplierRule] = &[
    SupplierRule {
        needles: &["finanzamt"],
        account: "4340",
        label: "tax authority",
    },
    SupplierRule {
        needles: &["stadtkasse", "gemeindekasse", "steueramt"],
        account: "4320",
        label: "municipal tax office",
    },
    SupplierRule {
        needles: &[" ihk ", "industrie- und handelskammer", "handwerkskammer"],
        account: "4380",
        label: "chamber of commerce",
    },
    SupplierRule {
        needles: &["telekom", "vodafone", "telefonica", " o2 ", "1&1 telecom"],
        account: "4920",
        label: "telecom carrier",
    },
    SupplierRule {
        needles: &["strato", "ionos", "hetzner", "host europe", "all-inkl"],
        account: "4925",
        label: "hosting provider",
    },
    SupplierRule {
        needles: &["amazon", "ebay", "otto gmbh"],
        account: "4930",
        label: "online marketplace",
    },
    SupplierRule {
        needles: &[" dhl", " dpd ", "hermes", " ups ", "deutsche post", " gls "],
        account: "4910",
        label: "parcel carrier",
    },
];

/// Which rule produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionBasis {
    /// The creditor's curated default account.
    CreditorDefault,
    /// A template keyword rule.
    TemplateRule {
        /// The keyword that triggered the rule.
        keyword: &'static str,
    },
    /// The weighted keyword scan.
    KeywordScan {
        /// Number of the account's keywords found.
        hits: u32,
    },
    /// A supplier-name business rule.
    SupplierRule {
        /// Kind of supplier recognized.
        rule: &'static str,
    },
    /// The miscellaneous-expense fallback.
    Fallback,
}

impl fmt::Display for SuggestionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreditorDefault => f.write_str("creditor default account"),
            Self::TemplateRule { keyword } => write!(f, "template rule '{keyword}'"),
            Self::KeywordScan { hits } => write!(f, "keyword match ({hits} hits)"),
            Self::SupplierRule { rule } => write!(f, "supplier rule ({rule})"),
            Self::Fallback => f.write_str("fallback account"),
        }
    }
}

/// A suggested account with its score and the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAccount {
    /// Suggested debit account.
    pub account: Account,
    /// Rule-specific score; for the keyword scan the weighted total.
    pub score: u32,
    /// The rule that fired.
    pub basis: SuggestionBasis,
}

/// Suggests debit accounts from a chart and engine thresholds.
///
/// # Example
///
/// ```
/// use kontierung::accounts::AccountRegistry;
/// use kontierung::booking::{AccountSuggester, SuggestionBasis};
/// use kontierung::core::{EngineConfig, Template};
///
/// let registry = AccountRegistry::skr03();
/// let config = EngineConfig::default();
/// let suggester = AccountSuggester::new(&registry, &config);
///
/// let hit = suggester
///     .suggest_scored("Hosting und Domain für 12 Monate, Server", None, Template::Generic, None)
///     .unwrap();
/// assert_eq!(hit.account.code, "4925");
/// assert_eq!(hit.basis, SuggestionBasis::KeywordScan { hits: 3 });
/// ```
pub struct AccountSuggester<'a> {
    registry: &'a AccountRegistry,
    config: &'a EngineConfig,
}

impl<'a> AccountSuggester<'a> {
    /// A suggester over `registry`.
    pub fn new(registry: &'a AccountRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The suggested debit account, or `None` when no rule applies.
    pub fn suggest(
        &self,
        text: &str,
        supplier_name: Option<&str>,
        template: Template,
        creditor_default_account: Option<&str>,
    ) -> Option<Account> {
        self.suggest_scored(text, supplier_name, template, creditor_default_account)
            .map(|s| s.account)
    }

    /// Like [`AccountSuggester::suggest`], with score and rule.
    pub fn suggest_scored(
        &self,
        text: &str,
        supplier_name: Option<&str>,
        template: Template,
        creditor_default_account: Option<&str>,
    ) -> Option<ScoredAccount> {
        let supplier_name = supplier_name.map(str::trim).filter(|n| !n.is_empty());

        let suggestion = creditor_default_account
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|code| self.creditor_default(code))
            .or_else(|| self.template_rule(text, template))
            .or_else(|| self.keyword_scan(text, supplier_name, template))
            .or_else(|| supplier_name.and_then(|name| self.supplier_rule(name)));

        match &suggestion {
            Some(s) => debug!(
                account = %s.account.code,
                score = s.score,
                basis = %s.basis,
                "Account suggested"
            ),
            None => debug!("No account suggestion"),
        }
        suggestion
    }

    fn creditor_default(&self, code: &str) -> ScoredAccount {
        let account = match self.registry.lookup_by_code(code) {
            Some(account) => account.clone(),
            None => {
                warn!(code, "Creditor default account is not in the chart");
                Account::new(
                    code,
                    format!("Konto {code}"),
                    AccountType::Expense,
                    "",
                    std::iter::empty::<&str>(),
                )
            }
        };
        ScoredAccount {
            account,
            score: CREDITOR_DEFAULT_SCORE,
            basis: SuggestionBasis::CreditorDefault,
        }
    }

    fn template_rule(&self, text: &str, template: Template) -> Option<ScoredAccount> {
        let (rule, keyword) = TemplateProfile::of(template).account_rule_for(text)?;
        let Some(account) = self.registry.lookup_by_code(rule.account) else {
            debug!(code = rule.account, "Template rule account not in chart, skipped");
            return None;
        };
        Some(ScoredAccount {
            account: account.clone(),
            score: TEMPLATE_RULE_SCORE,
            basis: SuggestionBasis::TemplateRule { keyword },
        })
    }

    fn keyword_scan(
        &self,
        text: &str,
        supplier_name: Option<&str>,
        template: Template,
    ) -> Option<ScoredAccount> {
        let haystack = format!("{} {}", supplier_name.unwrap_or_default(), text).to_lowercase();
        let template_category = TemplateProfile::of(template).category;

        let mut best: Option<(&Account, u32, u32)> = None;
        for account in self.registry.iter() {
            let hits = account
                .keywords
                .iter()
                .filter(|k| haystack.contains(k.as_str()))
                .count() as u32;
            if hits == 0 {
                continue;
            }
            let mut score = hits * KEYWORD_HIT_POINTS;
            if template_category.is_some_and(|c| c.eq_ignore_ascii_case(&account.category)) {
                score += TEMPLATE_CATEGORY_BONUS;
            }
            if POPULAR_CATEGORIES
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&account.category))
            {
                score += POPULAR_CATEGORY_BONUS;
            }
            // Strictly greater: the first account in chart order keeps a tie.
            if best.is_none_or(|(_, best_score, _)| score > best_score) {
                best = Some((account, score, hits));
            }
        }

        let (account, score, hits) = best?;
        if score <= self.config.min_keyword_score {
            debug!(
                account = %account.code,
                score,
                threshold = self.config.min_keyword_score,
                "Keyword scan below threshold"
            );
            return None;
        }
        Some(ScoredAccount {
            account: account.clone(),
            score,
            basis: SuggestionBasis::KeywordScan { hits },
        })
    }

    fn supplier_rule(&self, supplier_name: &str) -> Option<ScoredAccount> {
        let padded = format!(" {} ", normalize_name(supplier_name));
        let matched = SUPPLIER_RULES
            .iter()
            .filter(|rule| rule.needles.iter().any(|n| padded.contains(n)))
            .find_map(|rule| {
                self.registry
                    .lookup_by_code(rule.account)
                    .map(|account| ScoredAccount {
                        account: account.clone(),
                        score: SUPPLIER_RULE_SCORE,
                        basis: SuggestionBasis::SupplierRule { rule: rule.label },
                    })
            });
        matched.or_else(|| {
            self.registry
                .lookup_by_code(&self.config.fallback_account)
                .map(|account| ScoredAccount {
                    account: account.clone(),
                    score: FALLBACK_SCORE,
                    basis: SuggestionBasis::Fallback,
                })
        })
    }
}
