//! Creditor resolution against an external directory.
//!
//! The core never assumes a storage engine: [`CreditorDirectory`] is the
//! narrow read/create interface, [`InMemoryDirectory`] a thread-safe
//! implementation for tests and embedding.
//!
//! # Example
//!
//! ```
//! use kontierung::core::CreditorBuilder;
//! use kontierung::creditor::{CreditorResolver, InMemoryDirectory, MatchBasis};
//!
//! let directory = InMemoryDirectory::with_creditors(vec![
//!     CreditorBuilder::new("K-1", "FAMO GmbH").tax_id("DE123456789").build(),
//!     CreditorBuilder::new("K-2", "FAMO Werkstatt GmbH").build(),
//! ]);
//! let resolver = CreditorResolver::new(&directory);
//!
//! // A tax id match beats a name match on another record.
//! let hit = resolver
//!     .resolve(Some("FAMO Werkstatt GmbH"), Some("DE 123 456 789"), None)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(hit.creditor.id, "K-1");
//! assert_eq!(hit.basis, MatchBasis::TaxId);
//! ```

mod directory;
mod resolver;

pub use directory::{CreditorDirectory, InMemoryDirectory};
pub use resolver::{
    CreditorResolver, MatchBasis, Resolution, name_tokens, provenance_note,
    select_exact_name, select_shortest_containing, select_similar_tax_id,
};
