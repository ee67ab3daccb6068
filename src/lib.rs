//! # kontierung
//!
//! Invoice understanding and booking proposals for German supplier invoices:
//! field extraction from OCR/PDF text, supplier template recognition,
//! creditor resolution, and SKR03 account assignment (Kontierung).
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use kontierung::accounts::AccountRegistry;
//! use kontierung::creditor::InMemoryDirectory;
//! use kontierung::pipeline::InvoiceProcessor;
//! use kontierung::core::EngineConfig;
//!
//! let registry = AccountRegistry::skr03();
//! let directory = InMemoryDirectory::new();
//! let processor = InvoiceProcessor::new(&registry, &directory, EngineConfig::default());
//!
//! let text = "Büro & Mehr GmbH\nRechnung Nr. R-2024-001\nDatum: 15.01.2024\n\
//!             Büromaterial Papier und Ordner\nGesamtbetrag: 287,50 EUR";
//! let doc = processor.process_text("demo-1", text).unwrap();
//!
//! let proposal = doc.proposal.unwrap();
//! assert_eq!(proposal.debit_account, "4930");
//! assert_eq!(proposal.credit_account, "1600");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Extraction, creditor resolution, account suggestion, composition |
//! | `pdf` | Text extraction from digital PDFs via `lopdf` |
//! | `async` | Per-document timeout wrapper on `tokio` |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod accounts;

#[cfg(feature = "core")]
pub mod extract;

#[cfg(feature = "core")]
pub mod creditor;

#[cfg(feature = "core")]
pub mod booking;

#[cfg(feature = "core")]
pub mod pipeline;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
