//! # wonik-app — Wonik Health application layer
//!
//! Glues the offline core to the inference client:
//!
//! - [`advisor::Advisor`] asks the model and falls back to the knowledge
//!   base on any failure
//! - [`api::HealthApi`] is the facade a presentation layer talks to; it
//!   owns the medication store and returns `{success, …}` outcomes
//! - [`telemetry`] installs the tracing subscriber for the `wonik` binary

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod advisor;
pub mod api;
pub mod telemetry;

pub use advisor::Advisor;
pub use api::{AddOutcome, DeleteOutcome, HealthApi, UpdateOutcome};
