//! Marking error types.
//!
//! These errors mean the input document does not follow the expected marking
//! markup, or the scoring configuration makes the result meaningless. None of
//! them are retried; the document that raised one yields no report.

use thiserror::Error;

/// Errors raised while extracting, tallying or scoring one student document.
#[derive(Debug, Error)]
pub enum RemarkError {
    /// No node matched the participant-identifier query.
    #[error("participant identifier not found in document")]
    IdentifierNotFound,

    /// The document contains no question regions.
    #[error("no questions found in document")]
    NoQuestionsFound,

    /// Total achievable credit is zero, so a percentage is undefined.
    #[error("exam for '{name}' has no achievable credit; percentage is undefined")]
    DegenerateExam { name: String },

    /// An option carries more than one marking-state label.
    #[error("question {question}, option {option}: option carries conflicting marking labels")]
    ConflictingMarkings { question: usize, option: usize },

    /// Counts that cannot describe a real question.
    #[error("invalid tally: {marked} marked options exceed {total_options} total options")]
    InvalidTally { marked: u64, total_options: u32 },

    /// A configured attribute pattern is not a valid regular expression.
    #[error("invalid attribute pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RemarkError {
    /// Returns `true` if the error comes from the document rather than from
    /// configuration or scoring.
    pub fn is_markup_error(&self) -> bool {
        matches!(
            self,
            RemarkError::IdentifierNotFound
                | RemarkError::NoQuestionsFound
                | RemarkError::ConflictingMarkings { .. }
        )
    }
}

/// A document in a batch failed; the batch stops at that document.
#[derive(Debug, Error)]
#[error("document {} of the batch failed", .index + 1)]
pub struct BatchError {
    /// 0-based position of the failing document in the input.
    pub index: usize,
    #[source]
    pub source: RemarkError,
}
