//! End-to-end processing of one document.
//!
//! Stages run strictly in order: extraction, template recognition,
//! creditor resolution (or creation), account suggestion, composition.
//! Documents share nothing but the read-only chart and the creditor
//! directory, so independent documents may be processed in parallel.

#[cfg(feature = "async")]
mod timeout;

#[cfg(feature = "async")]
pub use timeout::process_with_timeout;

use std::path::Path;

use chrono::{Days, Local, NaiveDate};
use tracing::{debug, info};

use crate::accounts::AccountRegistry;
use crate::booking::{BookingComposer, ComposeContext};
use crate::core::{BookingProposal, Creditor, EngineConfig, ExtractedInvoiceData, KontierungError};
use crate::creditor::{CreditorDirectory, CreditorResolver, MatchBasis};
use crate::extract::{TextSource, extract_invoice_data};

/// Result classification for the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// A booking proposal is ready for confirmation.
    ProposalReady,
    /// Processed, but the invoice needs manual bookkeeping.
    PendingManualBooking,
}

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    /// Caller's document identifier.
    pub document_id: String,
    /// Extracted fields.
    pub extracted: ExtractedInvoiceData,
    /// Resolved or created creditor.
    pub creditor: Option<Creditor>,
    /// How an existing creditor was matched.
    pub creditor_match: Option<MatchBasis>,
    /// Whether the creditor was created while processing this document.
    pub creditor_created: bool,
    /// The booking proposal, if one could be made.
    pub proposal: Option<BookingProposal>,
    /// Human-readable processing log, in stage order.
    pub steps: Vec<String>,
}

impl ProcessedDocument {
    /// Whether a proposal is ready or manual booking is needed.
    pub fn outcome(&self) -> ProcessingOutcome {
        if self.proposal.is_some() {
            ProcessingOutcome::ProposalReady
        } else {
            ProcessingOutcome::PendingManualBooking
        }
    }
}

/// Runs the per-document pipeline against a chart and a creditor directory.
pub struct InvoiceProcessor<'a, D: CreditorDirectory + ?Sized> {
    registry: &'a AccountRegistry,
    directory: &'a D,
    config: EngineConfig,
    booking_date: Option<NaiveDate>,
}

impl<'a, D: CreditorDirectory + ?Sized> InvoiceProcessor<'a, D> {
    /// A processor with `config`; proposals are dated today.
    pub fn new(registry: &'a AccountRegistry, directory: &'a D, config: EngineConfig) -> Self {
        Self {
            registry,
            directory,
            config,
            booking_date: None,
        }
    }

    /// Date proposals and creditor notes with `date` instead of today.
    pub fn with_booking_date(mut self, date: NaiveDate) -> Self {
        self.booking_date = Some(date);
        self
    }

    /// The engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read the document at `path` through `source`, then process its text.
    pub fn process_file(
        &self,
        document_id: &str,
        path: &Path,
        source: &dyn TextSource,
    ) -> Result<ProcessedDocument, KontierungError> {
        let text = source.extract_text(path)?;
        self.process_text(document_id, &text)
    }

    /// Process already-extracted text.
    ///
    /// Errors are reserved for empty input and directory failures; a
    /// document without a proposal is an ordinary result.
    pub fn process_text(
        &self,
        document_id: &str,
        text: &str,
    ) -> Result<ProcessedDocument, KontierungError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KontierungError::Extraction(format!(
                "document {document_id} contains no text"
            )));
        }
        let today = self.booking_date.unwrap_or_else(|| Local::now().date_naive());
        let mut steps = Vec::new();

        let mut extracted = extract_invoice_data(text, &self.config);
        steps.push(format!("Text extracted: {} characters", text.chars().count()));
        steps.push(format!("Template detected: {}", extracted.template.code()));
        steps.push(format!("Extraction confidence: {}%", extracted.confidence));

        let resolver = CreditorResolver::new(self.directory);
        let resolution = resolver.resolve(
            extracted.supplier_name.as_deref(),
            extracted.supplier_tax_id.as_deref(),
            extracted.iban.as_deref(),
        )?;
        let (creditor, creditor_match, creditor_created) = match resolution {
            Some(r) => {
                steps.push(format!("Creditor found: {} ({})", r.creditor.name, r.basis));
                (Some(r.creditor), Some(r.basis), false)
            }
            None => match resolver.create_from_invoice_data(&extracted, today)? {
                Some(c) => {
                    steps.push(format!("Creditor created: {}", c.name));
                    (Some(c), None, true)
                }
                None => {
                    steps.push("Creditor: not identified".to_string());
                    (None, None, false)
                }
            },
        };

        if extracted.due_date.is_none() {
            let terms = creditor.as_ref().and_then(|c| c.payment_terms_days);
            if let (Some(issued), Some(days)) = (extracted.invoice_date, terms) {
                extracted.due_date = issued.checked_add_days(Days::new(u64::from(days)));
                debug!(document = document_id, days, "Due date derived from payment terms");
            }
        }

        let ctx = ComposeContext {
            document_id,
            text,
            supplier_name: extracted.supplier_name.as_deref(),
            supplier_tax_id: extracted.supplier_tax_id.as_deref(),
            creditor: creditor.as_ref(),
            creditor_match,
            amount: extracted.total_amount,
            vat_amount: extracted.vat_amount,
            vat_rate: extracted.vat_rate,
            template: extracted.template,
            invoice_number: extracted.invoice_number.as_deref(),
            booking_date: today,
        };
        let proposal = BookingComposer::new(self.registry, &self.config).compose(&ctx);
        match &proposal {
            Some(p) => {
                steps.push(format!(
                    "Booking proposal created: {} to {}",
                    p.debit_account, p.credit_account
                ));
                steps.push(format!("Confidence: {}%", p.confidence));
            }
            None => steps.push("Booking proposal: not created".to_string()),
        }

        info!(
            document = document_id,
            creditor_created,
            proposal = proposal.is_some(),
            "Document processed"
        );

        Ok(ProcessedDocument {
            document_id: document_id.to_string(),
            extracted,
            creditor,
            creditor_match,
            creditor_created,
            proposal,
            steps,
        })
    }
}
