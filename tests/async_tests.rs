//! Deadline-bounded processing on the tokio blocking pool.

#![cfg(feature = "async")]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kontierung::accounts::AccountRegistry;
use kontierung::core::*;
use kontierung::creditor::{CreditorDirectory, InMemoryDirectory};
use kontierung::pipeline::process_with_timeout;

/// Delays every name lookup.
struct SlowDirectory {
    inner: InMemoryDirectory,
    delay: Duration,
}

impl CreditorDirectory for SlowDirectory {
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Creditor>, KontierungError> {
        self.inner.find_by_tax_id(tax_id)
    }
    fn find_by_tax_id_fragment(&self, fragment: &str) -> Result<Vec<Creditor>, KontierungError> {
        self.inner.find_by_tax_id_fragment(fragment)
    }
    fn find_by_iban(&self, iban: &str) -> Result<Option<Creditor>, KontierungError> {
        self.inner.find_by_iban(iban)
    }
    fn find_by_name(&self, name: &str) -> Result<Vec<Creditor>, KontierungError> {
        thread::sleep(self.delay);
        self.inner.find_by_name(name)
    }
    fn create(&self, creditor: NewCreditor) -> Result<Creditor, KontierungError> {
        self.inner.create(creditor)
    }
}

const TEXT: &str = "Papierwelt GmbH\nPapier, Toner und Ordner\nSumme 80,00 €";

#[tokio::test]
async fn completes_within_deadline() {
    let doc = process_with_timeout(
        Arc::new(AccountRegistry::skr03()),
        Arc::new(InMemoryDirectory::new()),
        EngineConfig::default(),
        "a-1".to_string(),
        TEXT.to_string(),
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    assert_eq!(doc.proposal.unwrap().debit_account, "4930");
}

#[tokio::test]
async fn slow_directory_times_out() {
    let directory = Arc::new(SlowDirectory {
        inner: InMemoryDirectory::new(),
        delay: Duration::from_millis(300),
    });
    let err = process_with_timeout(
        Arc::new(AccountRegistry::skr03()),
        directory,
        EngineConfig::default(),
        "a-2".to_string(),
        TEXT.to_string(),
        Duration::from_millis(20),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, KontierungError::Timeout(20)));
    assert!(err.is_document_failure());
}

#[tokio::test]
async fn empty_text_error_passes_through() {
    let err = process_with_timeout(
        Arc::new(AccountRegistry::skr03()),
        Arc::new(InMemoryDirectory::new()),
        EngineConfig::default(),
        "a-3".to_string(),
        "  ".to_string(),
        Duration::from_secs(5),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, KontierungError::Extraction(_)));
}
