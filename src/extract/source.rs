//! Document text sources: the `extract_text(path)` collaborator.
//!
//! The implementation is chosen by MIME type, which is detected from the
//! file extension. Plain text is read as-is, digital PDFs go through `lopdf`
//! (feature `pdf`), and images are handed to a caller-supplied [`OcrEngine`].

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::KontierungError;

/// Minimum number of non-whitespace characters expected from a digital PDF.
/// Below this the PDF is treated as scanned.
pub const MIN_PDF_TEXT_CHARS: usize = 30;

/// MIME type for a file extension, case-insensitive.
///
/// ```
/// use std::path::Path;
/// use kontierung::extract::detect_mime_type;
///
/// assert_eq!(detect_mime_type(Path::new("scan.JPG")), Some("image/jpeg"));
/// assert_eq!(detect_mime_type(Path::new("invoice.pdf")), Some("application/pdf"));
/// assert_eq!(detect_mime_type(Path::new("archive.zip")), None);
/// ```
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Optical character recognition, supplied by the caller.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text of an image or scanned PDF.
    fn recognize(&self, bytes: &[u8], mime_type: &str) -> Result<String, KontierungError>;
}

/// Turns a stored document into plain text.
pub trait TextSource: Send + Sync {
    /// Extract the text of the document at `path`.
    ///
    /// Unreadable, corrupt, or empty documents are errors.
    fn extract_text(&self, path: &Path) -> Result<String, KontierungError>;
}

/// Default [`TextSource`] dispatching on MIME type.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kontierung::extract::{DocumentTextSource, TextSource};
///
/// let source = DocumentTextSource::new();
/// let text = source.extract_text(Path::new("rechnung.txt")).unwrap();
/// ```
#[derive(Default)]
pub struct DocumentTextSource {
    ocr: Option<Box<dyn OcrEngine>>,
}

impl DocumentTextSource {
    /// A source without OCR: images are unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `engine` for images and scanned PDFs.
    pub fn with_ocr(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Some(Box::new(engine));
        self
    }

    /// Extract text from in-memory bytes of the given MIME type.
    pub fn extract_bytes(&self, bytes: &[u8], mime_type: &str) -> Result<String, KontierungError> {
        let text = match mime_type {
            "text/plain" => String::from_utf8_lossy(bytes).into_owned(),
            "application/pdf" => self.pdf_text(bytes)?,
            m if m.starts_with("image/") => self.ocr_text(bytes, m)?,
            other => {
                return Err(KontierungError::UnsupportedDocument(format!(
                    "no text source for MIME type {other}"
                )));
            }
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(KontierungError::Extraction("document contains no text".into()));
        }
        Ok(text.to_string())
    }

    fn ocr_text(&self, bytes: &[u8], mime_type: &str) -> Result<String, KontierungError> {
        match &self.ocr {
            Some(engine) => {
                debug!(mime_type, bytes = bytes.len(), "Running OCR");
                engine.recognize(bytes, mime_type)
            }
            None => Err(KontierungError::UnsupportedDocument(format!(
                "{mime_type} requires an OCR engine"
            ))),
        }
    }

    #[cfg(feature = "pdf")]
    fn pdf_text(&self, bytes: &[u8]) -> Result<String, KontierungError> {
        let text = pdf_text_layer(bytes)?;
        let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful >= MIN_PDF_TEXT_CHARS {
            tracing::info!(chars = meaningful, "PDF text layer extracted");
            return Ok(text);
        }
        match &self.ocr {
            Some(_) => {
                tracing::info!(chars = meaningful, "PDF text layer too short, treating as scanned");
                self.ocr_text(bytes, "application/pdf")
            }
            None => Err(KontierungError::Extraction(format!(
                "PDF has no usable text layer ({meaningful} characters) and no OCR engine is configured"
            ))),
        }
    }

    #[cfg(not(feature = "pdf"))]
    fn pdf_text(&self, bytes: &[u8]) -> Result<String, KontierungError> {
        if self.ocr.is_some() {
            return self.ocr_text(bytes, "application/pdf");
        }
        Err(KontierungError::UnsupportedDocument(
            "PDF text extraction requires the `pdf` feature".into(),
        ))
    }
}

impl TextSource for DocumentTextSource {
    fn extract_text(&self, path: &Path) -> Result<String, KontierungError> {
        let mime_type = detect_mime_type(path).ok_or_else(|| {
            KontierungError::UnsupportedDocument(format!(
                "unknown file type: {}",
                path.display()
            ))
        })?;
        let bytes = fs::read(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Cannot read document");
            KontierungError::Extraction(format!("cannot read {}: {e}", path.display()))
        })?;
        self.extract_bytes(&bytes, mime_type)
    }
}

#[cfg(feature = "pdf")]
fn pdf_text_layer(bytes: &[u8]) -> Result<String, KontierungError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| KontierungError::Extraction(format!("failed to load PDF: {e}")))?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }
    doc.extract_text(&pages)
        .map_err(|e| KontierungError::Extraction(format!("failed to extract PDF text: {e}")))
}
