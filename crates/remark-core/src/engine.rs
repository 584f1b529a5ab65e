//! Marking pipeline orchestrator.
//!
//! Runs extraction, scoring and report building for each student document in
//! turn, and folds the results into a batch summary.

use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::config::{MarkupConfig, ScoringConfig};
use crate::error::{BatchError, RemarkError};
use crate::extract::Extractor;
use crate::report::{build_report, BatchAggregator, BatchSummary, RunReport, StudentReport};
use crate::scoring::ScoringPolicy;
use crate::traits::TreeNode;

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_student_start(&self, index: usize);
    fn on_student_complete(&self, index: usize, report: &StudentReport);
    fn on_student_error(&self, index: usize, error: &RemarkError);
    fn on_batch_complete(&self, students: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_student_start(&self, _: usize) {}
    fn on_student_complete(&self, _: usize, _: &StudentReport) {}
    fn on_student_error(&self, _: usize, _: &RemarkError) {}
    fn on_batch_complete(&self, _: usize, _: Duration) {}
}

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Per-student reports in input order.
    pub reports: Vec<StudentReport>,
    pub summary: BatchSummary,
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// Package the outcome for JSON persistence.
    pub fn into_run_report(self, policy: &str) -> RunReport {
        RunReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            policy: policy.to_string(),
            students: self.reports,
            summary: self.summary,
            duration_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// Extracts and re-marks student documents with one scoring policy.
pub struct Remarker {
    extractor: Extractor,
    policy: Box<dyn ScoringPolicy>,
}

impl Remarker {
    pub fn new(extractor: Extractor, policy: Box<dyn ScoringPolicy>) -> Self {
        Self { extractor, policy }
    }

    /// Build from markup and scoring configuration.
    pub fn from_config(markup: &MarkupConfig, scoring: &ScoringConfig) -> Result<Self, RemarkError> {
        Ok(Self::new(Extractor::new(markup)?, scoring.build()))
    }

    pub fn policy(&self) -> &dyn ScoringPolicy {
        self.policy.as_ref()
    }

    /// Produce the complete report for one student document.
    pub fn mark_student<N: TreeNode>(&self, doc: &N) -> Result<StudentReport, RemarkError> {
        let exam = self.extractor.extract(doc)?;
        let report = build_report(&exam.name, &exam.tallies, self.policy.as_ref())?;
        tracing::info!(
            student = %report.name,
            questions = report.rows.len(),
            mark = report.totals.actual_mark,
            max = report.totals.max_mark,
            "marked student"
        );
        Ok(report)
    }

    /// Mark every document in order. The first failure stops the batch.
    pub fn process_all<N, I>(
        &self,
        docs: I,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchOutcome, BatchError>
    where
        N: TreeNode,
        I: IntoIterator<Item = N>,
    {
        let start = Instant::now();
        let mut aggregator = BatchAggregator::new();
        let mut reports = Vec::new();

        for (index, doc) in docs.into_iter().enumerate() {
            progress.on_student_start(index);
            match self.mark_student(&doc) {
                Ok(report) => {
                    progress.on_student_complete(index, &report);
                    aggregator.push(&report);
                    reports.push(report);
                }
                Err(source) => {
                    tracing::error!("document {} failed: {source}", index + 1);
                    progress.on_student_error(index, &source);
                    return Err(BatchError { index, source });
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(reports.len(), elapsed);

        Ok(BatchOutcome {
            reports,
            summary: aggregator.finish(),
            elapsed,
        })
    }
}
