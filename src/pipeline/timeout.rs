use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::{InvoiceProcessor, ProcessedDocument};
use crate::accounts::AccountRegistry;
use crate::core::{EngineConfig, KontierungError};
use crate::creditor::CreditorDirectory;

/// Process `text` on the blocking pool, abandoning it after `timeout`.
///
/// On timeout only this document fails with [`KontierungError::Timeout`].
/// A creditor created before the deadline stays in the directory.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::sync::Arc;
/// use std::time::Duration;
/// use kontierung::accounts::AccountRegistry;
/// use kontierung::core::EngineConfig;
/// use kontierung::creditor::InMemoryDirectory;
/// use kontierung::pipeline::process_with_timeout;
///
/// let doc = process_with_timeout(
///     Arc::new(AccountRegistry::skr03()),
///     Arc::new(InMemoryDirectory::new()),
///     EngineConfig::default(),
///     "doc-7".to_string(),
///     "Papierwelt GmbH\nPapier und Toner\nSumme 80,00 €".to_string(),
///     Duration::from_secs(5),
/// )
/// .await
/// .unwrap();
/// assert!(doc.proposal.is_some());
/// # }
/// ```
pub async fn process_with_timeout<D>(
    registry: Arc<AccountRegistry>,
    directory: Arc<D>,
    config: EngineConfig,
    document_id: String,
    text: String,
    timeout: Duration,
) -> Result<ProcessedDocument, KontierungError>
where
    D: CreditorDirectory + 'static,
{
    let id = document_id.clone();
    let task = tokio::task::spawn_blocking(move || {
        InvoiceProcessor::new(&registry, directory.as_ref(), config)
            .process_text(&document_id, &text)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(KontierungError::Extraction(format!(
            "processing of {id} aborted: {join_error}"
        ))),
        Err(_) => {
            warn!(
                document = %id,
                timeout_ms = timeout.as_millis() as u64,
                "Document processing timed out"
            );
            Err(KontierungError::Timeout(timeout.as_millis()))
        }
    }
}
