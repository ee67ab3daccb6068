//! Core value objects, configuration, and the crate error type.
//!
//! The types here carry no behavior beyond construction and normalization;
//! they are passed between the extraction, creditor and booking stages and
//! handed to the caller for persistence.

mod config;
mod error;
mod normalize;
mod types;

pub use config::*;
pub use error::*;
pub use normalize::*;
pub use types::*;
