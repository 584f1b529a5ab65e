//! Extraction of the participant name and per-question tallies.
//!
//! Marking state is read from per-option labels only. The position or number
//! of options inside a question never matters.

use serde::Serialize;

use crate::config::MarkupConfig;
use crate::error::RemarkError;
use crate::model::QuestionTally;
use crate::traits::{collapse_whitespace, AttrQuery, LabelQuery, TreeNode};

/// Everything extracted from one student document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedExam {
    /// Display name of the participant.
    pub name: String,
    /// One tally per question, in document order.
    pub tallies: Vec<QuestionTally>,
}

#[derive(Debug, Clone)]
struct MarkingLabels {
    selected_correct: String,
    selected_incorrect: String,
    unselected_correct: String,
}

/// Locates and classifies the marked regions of an exam report.
#[derive(Debug, Clone)]
pub struct Extractor {
    identifier: AttrQuery,
    region: LabelQuery,
    option: LabelQuery,
    labels: MarkingLabels,
}

impl Extractor {
    /// Build an extractor from markup conventions.
    pub fn new(config: &MarkupConfig) -> Result<Self, RemarkError> {
        Ok(Self {
            identifier: AttrQuery::new(
                &config.identifier_tag,
                &config.identifier_attribute,
                &config.identifier_pattern,
            )?,
            region: LabelQuery::new(&config.region_tag, &config.region_label),
            option: LabelQuery::new(&config.option_tag, &config.option_label),
            labels: MarkingLabels {
                selected_correct: config.selected_correct_label.clone(),
                selected_incorrect: config.selected_incorrect_label.clone(),
                unselected_correct: config.unselected_correct_label.clone(),
            },
        })
    }

    /// Participant display name, whitespace-normalised.
    pub fn find_participant_name<N: TreeNode>(&self, doc: &N) -> Result<String, RemarkError> {
        let node = doc
            .find_first(&self.identifier)
            .ok_or(RemarkError::IdentifierNotFound)?;
        let name = collapse_whitespace(&node.text());
        if name.is_empty() {
            tracing::warn!("participant identifier node has no text");
        }
        Ok(name)
    }

    /// All question regions, in document order.
    pub fn find_question_regions<N: TreeNode>(&self, doc: &N) -> Result<Vec<N>, RemarkError> {
        let regions = doc.find_all(&self.region);
        if regions.is_empty() {
            return Err(RemarkError::NoQuestionsFound);
        }
        Ok(regions)
    }

    /// Count option states inside one region. `question` is the 1-based
    /// position of the region, used in errors and logs.
    pub fn tally_region<N: TreeNode>(
        &self,
        question: usize,
        region: &N,
    ) -> Result<QuestionTally, RemarkError> {
        let mut total_options = 0u32;
        let mut selected_correct = 0u32;
        let mut selected_incorrect = 0u32;
        let mut unselected_correct = 0u32;

        for (index, option) in region.find_all(&self.option).iter().enumerate() {
            total_options += 1;

            let flags = [
                option.has_label(&self.labels.selected_correct),
                option.has_label(&self.labels.selected_incorrect),
                option.has_label(&self.labels.unselected_correct),
            ];
            // A single option must carry at most one marking state.
            if flags.iter().filter(|&&f| f).count() > 1 {
                return Err(RemarkError::ConflictingMarkings {
                    question,
                    option: index + 1,
                });
            }

            if flags[0] {
                selected_correct += 1;
            }
            if flags[1] {
                selected_incorrect += 1;
            }
            if flags[2] {
                unselected_correct += 1;
            }
        }

        if total_options == 0 {
            tracing::warn!(question, "question region contains no answer options");
        }

        let tally = QuestionTally::new(
            total_options,
            selected_correct,
            selected_incorrect,
            unselected_correct,
        )?;
        tracing::debug!(question, %tally, "tallied question");
        Ok(tally)
    }

    /// Name and tallies for a whole document.
    pub fn extract<N: TreeNode>(&self, doc: &N) -> Result<ExtractedExam, RemarkError> {
        let name = self.find_participant_name(doc)?;
        let tallies = self
            .find_question_regions(doc)?
            .iter()
            .enumerate()
            .map(|(i, region)| self.tally_region(i + 1, region))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExtractedExam { name, tallies })
    }
}
