use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::skr03::{ChartEntry, SKR03_CHART};
use crate::core::KontierungError;

/// Account class within the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Aktiva.
    Asset,
    /// Passiva.
    Liability,
    /// Aufwand.
    Expense,
    /// Ertrag.
    Revenue,
}

impl AccountType {
    /// German label as used in SKR03 listings.
    pub fn german(&self) -> &'static str {
        match self {
            Self::Asset => "Aktiva",
            Self::Liability => "Passiva",
            Self::Expense => "Aufwand",
            Self::Revenue => "Ertrag",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.german())
    }
}

impl FromStr for AccountType {
    type Err = KontierungError;

    /// Accepts English and German labels, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "aktiva" => Ok(Self::Asset),
            "liability" | "passiva" => Ok(Self::Liability),
            "expense" | "aufwand" => Ok(Self::Expense),
            "revenue" | "ertrag" => Ok(Self::Revenue),
            other => Err(KontierungError::Config(format!(
                "unknown account type '{other}'"
            ))),
        }
    }
}

/// A chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric account code, unique within a registry.
    pub code: String,
    /// German account name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
    /// Grouping used by template bonuses and narratives.
    pub category: String,
    /// Lower-case keyword tags, de-duplicated, in declaration order.
    pub keywords: Vec<String>,
}

impl Account {
    /// Create an account; keywords are lower-cased and de-duplicated.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        category: impl Into<String>,
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !tags.contains(&kw) {
                tags.push(kw);
            }
        }
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            category: category.into(),
            keywords: tags,
        }
    }

    /// Whether booking to this account capitalizes the purchase.
    pub fn is_capitalizable(&self) -> bool {
        self.account_type == AccountType::Asset
    }
}

impl From<&ChartEntry> for Account {
    fn from(entry: &ChartEntry) -> Self {
        Account::new(
            entry.code,
            entry.name,
            entry.account_type,
            entry.category,
            entry.keywords.iter().copied(),
        )
    }
}

/// Immutable chart of accounts, built once and shared read-only.
///
/// # Example
///
/// ```
/// use kontierung::accounts::{AccountRegistry, AccountType};
///
/// let chart = AccountRegistry::skr03();
/// assert_eq!(chart.lookup_by_code("4930").unwrap().name, "Bürobedarf");
/// assert!(chart.lookup_by_code("9999").is_none());
/// assert!(!chart.list_by_type(AccountType::Liability).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
    by_code: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    code: String,
    name: String,
    #[serde(rename = "type")]
    account_type: String,
    category: String,
    #[serde(default)]
    keywords: String,
}

impl AccountRegistry {
    /// The embedded SKR03 table.
    pub fn skr03() -> Self {
        let accounts = SKR03_CHART.iter().map(Account::from).collect::<Vec<_>>();
        let by_code = accounts
            .iter()
            .enumerate()
            .map(|(i, a)| (a.code.clone(), i))
            .collect();
        Self { accounts, by_code }
    }

    /// Build from explicit accounts. Fails on duplicate or non-numeric codes.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, KontierungError> {
        let mut by_code = HashMap::with_capacity(accounts.len());
        for (i, account) in accounts.iter().enumerate() {
            if account.code.is_empty() || !account.code.chars().all(|c| c.is_ascii_digit()) {
                return Err(KontierungError::Config(format!(
                    "account code '{}' is not numeric",
                    account.code
                )));
            }
            if by_code.insert(account.code.clone(), i).is_some() {
                return Err(KontierungError::Config(format!(
                    "duplicate account code {}",
                    account.code
                )));
            }
        }
        Ok(Self { accounts, by_code })
    }

    /// Parse a `;`-delimited chart with header `code;name;type;category;keywords`.
    ///
    /// Keywords are `|`-separated. Types accept `Asset`/`Aktiva`,
    /// `Liability`/`Passiva`, `Expense`/`Aufwand`, `Revenue`/`Ertrag`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, KontierungError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(reader);

        let mut accounts = Vec::new();
        for (index, row) in csv_reader.deserialize::<AccountRow>().enumerate() {
            let row = row.map_err(|e| {
                KontierungError::Config(format!("invalid chart record {}: {e}", index + 1))
            })?;
            let account_type = row.account_type.parse::<AccountType>()?;
            accounts.push(Account::new(
                row.code,
                row.name,
                account_type,
                row.category,
                row.keywords.split('|'),
            ));
        }
        if accounts.is_empty() {
            return Err(KontierungError::Config("chart of accounts is empty".into()));
        }
        Self::from_accounts(accounts)
    }

    /// Read a chart file (see [`AccountRegistry::from_csv_reader`]).
    pub fn from_csv_file(path: impl AsRef<Path>) -> Result<Self, KontierungError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| {
            KontierungError::Config(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::from_csv_reader(file)
    }

    /// Load the chart file if it exists, else fall back to the embedded SKR03 table.
    ///
    /// A file that exists but does not parse is an error, not a fallback.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, KontierungError> {
        match path {
            Some(p) if p.exists() => {
                let registry = Self::from_csv_file(p)?;
                info!(path = %p.display(), accounts = registry.len(), "Loaded chart of accounts");
                Ok(registry)
            }
            Some(p) => {
                debug!(path = %p.display(), "Chart file not found, using embedded SKR03");
                Ok(Self::skr03())
            }
            None => Ok(Self::skr03()),
        }
    }

    /// Look up an account by code.
    pub fn lookup_by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code.trim()).map(|&i| &self.accounts[i])
    }

    /// All accounts of one type, in registry order.
    pub fn list_by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.account_type == account_type)
            .collect()
    }

    /// All accounts of one category (case-insensitive), in registry order.
    pub fn list_by_category(&self, category: &str) -> Vec<&Account> {
        let category = category.to_lowercase();
        self.accounts
            .iter()
            .filter(|a| a.category.to_lowercase() == category)
            .collect()
    }

    /// Accounts whose keyword tags or name contain `term` (case-insensitive).
    pub fn scan_by_keyword(&self, term: &str) -> Vec<&Account> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.accounts
            .iter()
            .filter(|a| {
                a.keywords.iter().any(|k| k.contains(&term))
                    || a.name.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Iterate in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::skr03()
    }
}
