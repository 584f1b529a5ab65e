//! Scoring policies.
//!
//! A policy turns one [`QuestionTally`] into a mark. Policies are pure and
//! see the tally read-only, so one instance can score any number of students.

use crate::config::{PolicyKind, ScoringConfig};
use crate::model::QuestionTally;

/// Maps a question tally to a mark.
pub trait ScoringPolicy: Send + Sync {
    /// Short name recorded in run reports (e.g. "penalty").
    fn name(&self) -> &str;

    /// Mark for one question. May be negative.
    fn mark(&self, tally: &QuestionTally) -> f64;
}

impl<F> ScoringPolicy for F
where
    F: Fn(&QuestionTally) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn mark(&self, tally: &QuestionTally) -> f64 {
        self(tally)
    }
}

// ---------------------------------------------------------------------------
// Penalty policy
// ---------------------------------------------------------------------------

/// Per-option credit with a deduction for each wrong selection.
///
/// Single-answer questions are all-or-nothing when `strict_single_answer` is
/// set: one mark for selecting exactly the correct option and nothing else,
/// zero otherwise. Multi-answer marks are not clamped at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyPolicy {
    pub correct_weight: f64,
    pub incorrect_penalty: f64,
    pub strict_single_answer: bool,
}

impl PenaltyPolicy {
    /// One mark per correct selection, a quarter off per wrong one.
    pub fn standard() -> Self {
        Self {
            correct_weight: 1.0,
            incorrect_penalty: 0.25,
            strict_single_answer: true,
        }
    }
}

impl ScoringPolicy for PenaltyPolicy {
    fn name(&self) -> &str {
        "penalty"
    }

    fn mark(&self, tally: &QuestionTally) -> f64 {
        if self.strict_single_answer && tally.is_single_answer() {
            return if tally.selected_correct() == 1 && tally.selected_incorrect() == 0 {
                1.0
            } else {
                0.0
            };
        }
        tally.selected_correct() as f64 * self.correct_weight
            - tally.selected_incorrect() as f64 * self.incorrect_penalty
    }
}

// ---------------------------------------------------------------------------
// All-or-nothing policy
// ---------------------------------------------------------------------------

/// Full credit (`total_correct` marks) only when every correct option and no
/// incorrect option was selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllOrNothingPolicy;

impl ScoringPolicy for AllOrNothingPolicy {
    fn name(&self) -> &str {
        "all-or-nothing"
    }

    fn mark(&self, tally: &QuestionTally) -> f64 {
        if tally.unselected_correct() == 0 && tally.selected_incorrect() == 0 {
            tally.total_correct() as f64
        } else {
            0.0
        }
    }
}

impl ScoringConfig {
    /// Instantiate the configured policy.
    pub fn build(&self) -> Box<dyn ScoringPolicy> {
        match self.policy {
            PolicyKind::Penalty => Box::new(PenaltyPolicy {
                correct_weight: self.correct_weight,
                incorrect_penalty: self.incorrect_penalty,
                strict_single_answer: self.strict_single_answer,
            }),
            PolicyKind::AllOrNothing => Box::new(AllOrNothingPolicy),
        }
    }
}
