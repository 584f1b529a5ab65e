//! remark-core: Extraction, tallying and scoring of marked exam reports.
//!
//! This crate reads marking state out of a parsed exam report through the
//! [`traits::TreeNode`] interface, tallies each question, applies a pluggable
//! [`scoring::ScoringPolicy`] and builds per-student and batch reports.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod report;
pub mod scoring;
pub mod traits;

#[cfg(test)]
mod testing;

pub use engine::{BatchOutcome, NoopReporter, ProgressReporter, Remarker};
pub use error::{BatchError, RemarkError};
pub use model::QuestionTally;
