use thiserror::Error;

/// Errors that can occur while processing a document.
///
/// Only hard failures live here. "Nothing found" outcomes (missing fields,
/// unknown creditor, no account suggestion) are modelled as `None`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KontierungError {
    /// The document could not be read or yielded no usable text.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The document type is not supported by any configured text source.
    #[error("unsupported document: {0}")]
    UnsupportedDocument(String),

    /// The creditor directory could not be read or written.
    #[error("creditor directory error: {0}")]
    Directory(String),

    /// Chart-of-accounts or engine configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Processing was abandoned because the caller's deadline passed.
    #[error("processing timed out after {0} ms")]
    Timeout(u128),
}

impl KontierungError {
    /// Whether the failure is confined to the current document.
    ///
    /// Directory and configuration errors affect every document of a run.
    pub fn is_document_failure(&self) -> bool {
        matches!(
            self,
            Self::Extraction(_) | Self::UnsupportedDocument(_) | Self::Timeout(_)
        )
    }
}
