//! Per-question tally data.

use std::fmt;

use serde::Serialize;

use crate::error::RemarkError;

/// Aggregated option counts for one question region.
///
/// Options that are neither selected nor correct are not counted
/// individually; they make up the remainder of `total_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionTally {
    total_options: u32,
    selected_correct: u32,
    selected_incorrect: u32,
    unselected_correct: u32,
}

impl QuestionTally {
    /// Build a tally, rejecting counts where more options are marked than exist.
    pub fn new(
        total_options: u32,
        selected_correct: u32,
        selected_incorrect: u32,
        unselected_correct: u32,
    ) -> Result<Self, RemarkError> {
        let marked = u64::from(selected_correct)
            + u64::from(selected_incorrect)
            + u64::from(unselected_correct);
        if marked > u64::from(total_options) {
            return Err(RemarkError::InvalidTally {
                marked,
                total_options,
            });
        }
        Ok(Self {
            total_options,
            selected_correct,
            selected_incorrect,
            unselected_correct,
        })
    }

    /// Number of option nodes in the question.
    pub fn total_options(&self) -> u32 {
        self.total_options
    }

    /// Options both selected and correct.
    pub fn selected_correct(&self) -> u32 {
        self.selected_correct
    }

    /// Options selected but incorrect.
    pub fn selected_incorrect(&self) -> u32 {
        self.selected_incorrect
    }

    /// Correct options the student missed.
    pub fn unselected_correct(&self) -> u32 {
        self.unselected_correct
    }

    /// Number of correct options, selected or not.
    pub fn total_correct(&self) -> u32 {
        // Bounded by `total_options`, checked in `new`.
        self.selected_correct + self.unselected_correct
    }

    /// Whether the question has exactly one correct option.
    pub fn is_single_answer(&self) -> bool {
        self.total_correct() == 1
    }
}

impl fmt::Display for QuestionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#answers={} #correct_answers={} #correct={} #incorrect={}",
            self.total_options,
            self.total_correct(),
            self.selected_correct,
            self.selected_incorrect
        )
    }
}
