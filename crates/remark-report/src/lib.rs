//! remark-report: Output writers for re-marked exams.
//!
//! Per-student and summary CSV tables, plus a self-contained HTML summary.

pub mod csv;
pub mod html;

pub use csv::{
    student_csv, summary_csv, write_student_csv, write_student_csvs, write_summary_csv,
};
pub use html::{generate_html, write_html_report};
