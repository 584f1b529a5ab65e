//! Student reports, batch summaries and the JSON run report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RemarkError;
use crate::model::QuestionTally;
use crate::scoring::ScoringPolicy;

/// One scored question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub total_options: u32,
    /// Correct options, selected or not ("valid answers").
    pub total_correct: u32,
    pub selected_correct: u32,
    pub selected_incorrect: u32,
    pub mark: f64,
}

/// Aggregate marks for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub max_mark: u32,
    pub actual_mark: f64,
    pub percentage: f64,
}

/// Scored questions and totals for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub name: String,
    /// Rows in question order.
    pub rows: Vec<ReportRow>,
    pub totals: Totals,
}

impl StudentReport {
    /// Name usable as a file stem: spaces and path separators become `_`.
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                other => other,
            })
            .collect()
    }

    /// Summary row for this student.
    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            name: self.name.clone(),
            max_mark: self.totals.max_mark,
            actual_mark: self.totals.actual_mark,
            percentage: self.totals.percentage,
        }
    }
}

/// Score every tally with `policy` and total the result.
///
/// Fails with [`RemarkError::DegenerateExam`] when no question has a correct
/// option, since the percentage would divide by zero.
pub fn build_report(
    name: &str,
    tallies: &[QuestionTally],
    policy: &dyn ScoringPolicy,
) -> Result<StudentReport, RemarkError> {
    let rows: Vec<ReportRow> = tallies
        .iter()
        .map(|t| ReportRow {
            total_options: t.total_options(),
            total_correct: t.total_correct(),
            selected_correct: t.selected_correct(),
            selected_incorrect: t.selected_incorrect(),
            mark: policy.mark(t),
        })
        .collect();

    let max_mark: u32 = rows.iter().map(|r| r.total_correct).sum();
    let actual_mark: f64 = rows.iter().map(|r| r.mark).sum();

    if max_mark == 0 {
        return Err(RemarkError::DegenerateExam {
            name: name.to_string(),
        });
    }

    Ok(StudentReport {
        name: name.to_string(),
        rows,
        totals: Totals {
            max_mark,
            actual_mark,
            percentage: actual_mark / max_mark as f64 * 100.0,
        },
    })
}

// ---------------------------------------------------------------------------
// Batch summary
// ---------------------------------------------------------------------------

/// One student's line in the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,
    pub max_mark: u32,
    pub actual_mark: f64,
    pub percentage: f64,
}

/// Summary rows in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub rows: Vec<SummaryRow>,
}

impl BatchSummary {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean percentage across students, if any.
    pub fn mean_percentage(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.rows.iter().map(|r| r.percentage).sum::<f64>() / self.rows.len() as f64)
    }
}

/// Append-only builder for a [`BatchSummary`].
#[derive(Debug, Default)]
pub struct BatchAggregator {
    summary: BatchSummary,
}

impl BatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: &StudentReport) {
        self.summary.rows.push(report.summary_row());
    }

    pub fn finish(self) -> BatchSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Everything produced by one batch run, for JSON persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Name of the scoring policy used.
    pub policy: String,
    /// Per-student reports in input order.
    pub students: Vec<StudentReport>,
    pub summary: BatchSummary,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize run report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write run report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run report from {}", path.display()))?;
        let report: RunReport =
            serde_json::from_str(&content).context("failed to parse run report JSON")?;
        Ok(report)
    }
}
