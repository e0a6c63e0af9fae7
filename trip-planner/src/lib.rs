//! Trip Planner
//!
//! In-memory trip state (member roster, expenses) around the settlement
//! engine, plus spending summaries and the translation seam.
//!
//! # Architecture
//!
//! - **Trip**: owned state container handed to the engine at call time
//! - **Summary**: per-currency totals and per-day expense listing
//! - **Translation**: opaque remote translator behind a trait, with history

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod trip;
pub mod summary;
pub mod translation;
pub mod error;

// Re-exports
pub use error::{Error, Result};
pub use trip::{Trip, TripDocument, TripSettings};
pub use summary::{group_by_date, spending_totals};
pub use translation::{
    TranslationError, TranslationLog, TranslationRecord, TranslationRequest, Translator,
};
