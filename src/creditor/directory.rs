use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::core::{
    Creditor, KontierungError, NewCreditor, normalize_iban, normalize_name, normalize_tax_id,
};

/// Storage-agnostic access to creditor records.
///
/// Lookups return inactive records too; filtering is the resolver's job.
/// Errors are reserved for storage failures. "Not found" is `Ok(None)` or
/// an empty list.
pub trait CreditorDirectory: Send + Sync {
    /// Creditor whose normalized tax id equals `tax_id`.
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Creditor>, KontierungError>;

    /// Creditors whose normalized tax id contains `fragment`.
    fn find_by_tax_id_fragment(&self, fragment: &str) -> Result<Vec<Creditor>, KontierungError>;

    /// Creditor whose normalized IBAN equals `iban`.
    fn find_by_iban(&self, iban: &str) -> Result<Option<Creditor>, KontierungError>;

    /// Creditors whose name contains `name`, case-insensitive.
    fn find_by_name(&self, name: &str) -> Result<Vec<Creditor>, KontierungError>;

    /// Persist a new creditor and return it with its assigned id.
    fn create(&self, creditor: NewCreditor) -> Result<Creditor, KontierungError>;
}

/// Thread-safe in-memory [`CreditorDirectory`].
///
/// Ids are assigned as `K00001`, `K00002`, ... for created records.
///
/// # Example
///
/// ```
/// use kontierung::core::CreditorBuilder;
/// use kontierung::creditor::{CreditorDirectory, InMemoryDirectory};
///
/// let directory = InMemoryDirectory::with_creditors(vec![
///     CreditorBuilder::new("K-1", "FAMO GmbH").tax_id("DE123456789").build(),
/// ]);
/// let found = directory.find_by_tax_id("DE123456789").unwrap();
/// assert_eq!(found.unwrap().name, "FAMO GmbH");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    creditors: RwLock<Vec<Creditor>>,
    next_id: AtomicU64,
}

impl InMemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory pre-populated with `creditors`.
    pub fn with_creditors(creditors: Vec<Creditor>) -> Self {
        Self {
            creditors: RwLock::new(creditors),
            next_id: AtomicU64::new(0),
        }
    }

    /// Add an existing record.
    pub fn insert(&self, creditor: Creditor) -> Result<(), KontierungError> {
        self.write()?.push(creditor);
        Ok(())
    }

    /// Snapshot of all records.
    pub fn all(&self) -> Result<Vec<Creditor>, KontierungError> {
        Ok(self.read()?.clone())
    }

    /// Number of records.
    pub fn count(&self) -> Result<usize, KontierungError> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Creditor>>, KontierungError> {
        self.creditors
            .read()
            .map_err(|_| KontierungError::Directory("creditor store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Creditor>>, KontierungError> {
        self.creditors
            .write()
            .map_err(|_| KontierungError::Directory("creditor store lock poisoned".into()))
    }

    fn find_first(
        &self,
        pred: impl Fn(&Creditor) -> bool,
    ) -> Result<Option<Creditor>, KontierungError> {
        let creditors = self.read()?;
        // An active record shadows an inactive one with the same identifier.
        let found = creditors
            .iter()
            .filter(|c| pred(c))
            .min_by_key(|c| !c.is_active)
            .cloned();
        Ok(found)
    }

    fn find_all(&self, pred: impl Fn(&Creditor) -> bool) -> Result<Vec<Creditor>, KontierungError> {
        Ok(self.read()?.iter().filter(|c| pred(c)).cloned().collect())
    }
}

impl CreditorDirectory for InMemoryDirectory {
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Creditor>, KontierungError> {
        let wanted = normalize_tax_id(tax_id);
        self.find_first(|c| c.tax_id.as_deref().map(normalize_tax_id).as_ref() == Some(&wanted))
    }

    fn find_by_tax_id_fragment(&self, fragment: &str) -> Result<Vec<Creditor>, KontierungError> {
        let fragment = normalize_tax_id(fragment);
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(|c| {
            c.tax_id
                .as_deref()
                .is_some_and(|t| normalize_tax_id(t).contains(&fragment))
        })
    }

    fn find_by_iban(&self, iban: &str) -> Result<Option<Creditor>, KontierungError> {
        let wanted = normalize_iban(iban);
        self.find_first(|c| c.iban.as_deref().map(normalize_iban).as_ref() == Some(&wanted))
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Creditor>, KontierungError> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(|c| normalize_name(&c.name).contains(&wanted))
    }

    fn create(&self, creditor: NewCreditor) -> Result<Creditor, KontierungError> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let record = Creditor {
            id: format!("K{n:05}"),
            name: creditor.name,
            tax_id: creditor.tax_id,
            iban: creditor.iban,
            address: creditor.address,
            city: None,
            zip_code: None,
            country: None,
            default_account: None,
            payable_account: None,
            payment_terms_days: None,
            is_active: true,
            notes: creditor.notes,
        };
        self.write()?.push(record.clone());
        debug!(id = %record.id, name = %record.name, "Creditor stored");
        Ok(record)
    }
}
