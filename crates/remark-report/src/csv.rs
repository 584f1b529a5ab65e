//! CSV tables for students and the batch summary.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use remark_core::report::{BatchSummary, StudentReport};

/// Column headers of a per-student table.
pub const STUDENT_HEADER: [&str; 5] = ["answers", "valid answers", "correct", "incorrect", "mark"];

/// Column headers of the batch summary table.
pub const SUMMARY_HEADER: [&str; 4] = ["Name", "Max mark", "Mark", "Percentage"];

const LINE_END: &str = "\r\n";

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render a mark or percentage. Integral values keep a trailing `.0`.
fn number(value: f64) -> String {
    format!("{value:?}")
}

fn push_line<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push_str(LINE_END);
}

/// Render one student's question table.
pub fn student_csv(report: &StudentReport) -> String {
    let mut out = String::new();
    push_line(&mut out, &STUDENT_HEADER);
    for row in &report.rows {
        push_line(
            &mut out,
            &[
                row.total_options.to_string(),
                row.total_correct.to_string(),
                row.selected_correct.to_string(),
                row.selected_incorrect.to_string(),
                number(row.mark),
            ],
        );
    }
    out
}

/// Render the batch summary table.
pub fn summary_csv(summary: &BatchSummary) -> String {
    let mut out = String::new();
    push_line(&mut out, &SUMMARY_HEADER);
    for row in &summary.rows {
        push_line(
            &mut out,
            &[
                row.name.clone(),
                row.max_mark.to_string(),
                number(row.actual_mark),
                number(row.percentage),
            ],
        );
    }
    out
}

/// Write `<dir>/<file stem>.csv` and return its path.
pub fn write_student_csv(report: &StudentReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}.csv", report.file_stem()));
    std::fs::write(&path, student_csv(report))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Write one table per student into `dir`, in batch order.
///
/// Students sharing a file stem keep distinct files: the first writes
/// `<stem>.csv`, later ones `<stem>_2.csv`, `<stem>_3.csv` and so on.
pub fn write_student_csvs(reports: &[StudentReport], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(reports.len());
    for report in reports {
        let stem = report.file_stem();
        let mut file_name = format!("{stem}.csv");
        let mut n = 1;
        while !used.insert(file_name.clone()) {
            n += 1;
            file_name = format!("{stem}_{n}.csv");
        }
        if n > 1 {
            tracing::warn!(
                student = %report.name,
                "file name {stem}.csv already used in this batch, writing {file_name}"
            );
        }

        let path = dir.join(&file_name);
        std::fs::write(&path, student_csv(report))
            .with_context(|| format!("failed to write {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Write the batch summary to `path`.
pub fn write_summary_csv(summary: &BatchSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, summary_csv(summary))
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    Ok(())
}
