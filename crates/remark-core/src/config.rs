//! Markup and scoring configuration.
//!
//! Defaults describe the marking markup the assessment platform currently
//! renders, and the standard penalty scheme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where to find things in a rendered exam report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Tag of the participant-identifier node.
    pub identifier_tag: String,
    /// Attribute tested on the participant-identifier node.
    pub identifier_attribute: String,
    /// Regex searched for in that attribute.
    pub identifier_pattern: String,
    /// Tag of a question region.
    pub region_tag: String,
    /// Label every question region carries.
    pub region_label: String,
    /// Tag of an answer option.
    pub option_tag: String,
    /// Label every answer option carries.
    pub option_label: String,
    /// Option was selected and is correct.
    pub selected_correct_label: String,
    /// Option was selected and is incorrect.
    pub selected_incorrect_label: String,
    /// Option is correct but was not selected.
    pub unselected_correct_label: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            identifier_tag: "div".into(),
            identifier_attribute: "ng-if".into(),
            identifier_pattern: "selectedParticipant.*!selectedGroup".into(),
            region_tag: "ul".into(),
            region_label: "lrn-response-validate-wrapper".into(),
            option_tag: "li".into(),
            option_label: "lrn-mcq-option".into(),
            selected_correct_label: "lrn_correct".into(),
            selected_incorrect_label: "lrn_incorrect".into(),
            unselected_correct_label: "lrn_valid".into(),
        }
    }
}

/// Built-in scoring policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Per-option credit with a penalty for wrong selections.
    #[default]
    Penalty,
    /// Full credit only for an exactly right selection.
    AllOrNothing,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Penalty => write!(f, "penalty"),
            PolicyKind::AllOrNothing => write!(f, "all-or-nothing"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "penalty" => Ok(PolicyKind::Penalty),
            "all-or-nothing" | "all_or_nothing" | "strict" => Ok(PolicyKind::AllOrNothing),
            other => Err(format!("unknown scoring policy: {other}")),
        }
    }
}

/// Scoring policy selection and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: PolicyKind,
    /// Credit per correctly selected option.
    #[serde(default = "default_correct_weight")]
    pub correct_weight: f64,
    /// Deduction per incorrectly selected option.
    #[serde(default = "default_incorrect_penalty")]
    pub incorrect_penalty: f64,
    /// Score single-answer questions as all-or-nothing.
    #[serde(default = "default_true")]
    pub strict_single_answer: bool,
}

fn default_correct_weight() -> f64 {
    1.0
}

fn default_incorrect_penalty() -> f64 {
    0.25
}

fn default_true() -> bool {
    true
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            correct_weight: default_correct_weight(),
            incorrect_penalty: default_incorrect_penalty(),
            strict_single_answer: true,
        }
    }
}
