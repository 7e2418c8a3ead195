//! # Wonik Health Core Library
//!
//! Everything that works without a network connection:
//!
//! - **Records** — recommendations, medication information, stored medications
//! - **Knowledge** — ordered offline tables of canned advice with
//!   whitespace/case-insensitive, bidirectional substring matching
//! - **Parser** — pulls a work/rest rhythm, a schedule hint and tips out of a
//!   free-form model answer, backfilling from the knowledge base
//! - **Medication tagger** — line-oriented field extraction for drug info
//! - **Validation** — user input rules for medication fields
//! - **Store** — SQLite-backed medication list
//!
//! Parsing and lookups are total: they always return a fully populated
//! record, so callers never have to handle a "no advice" case.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod knowledge;
pub mod med_tagger;
pub mod parser;
pub mod store;
pub mod types;
pub mod validation;

pub use config::WonikConfig;
pub use error::WonikError;
pub use knowledge::{lookup_medication, lookup_recommendation};
pub use med_tagger::parse_medication_info;
pub use parser::parse_recommendation;
pub use store::MedicationStore;
pub use types::*;
