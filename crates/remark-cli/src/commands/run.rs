//! The `remark` run: load, mark, write.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use remark_core::config::PolicyKind;
use remark_core::report::{BatchSummary, StudentReport};
use remark_core::{ProgressReporter, RemarkError, Remarker};
use remark_report::csv::{write_student_csvs, write_summary_csv};
use remark_report::html::write_html_report;
use remark_sources::config::load_config_from;
use remark_sources::{load_all, DocumentLoader, HtmlDocument, Source};

/// Console progress reporter.
struct ConsoleReporter<'a> {
    sources: &'a [Source],
}

impl ConsoleReporter<'_> {
    fn label(&self, index: usize) -> String {
        self.sources
            .get(index)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

impl ProgressReporter for ConsoleReporter<'_> {
    fn on_student_start(&self, index: usize) {
        eprintln!("  Marking: {}", self.label(index));
    }

    fn on_student_complete(&self, _index: usize, report: &StudentReport) {
        eprintln!(
            "  Done: {} {}/{} ({:.2}%)",
            report.name, report.totals.actual_mark, report.totals.max_mark, report.totals.percentage
        );
    }

    fn on_student_error(&self, index: usize, error: &RemarkError) {
        eprintln!("  ERROR: {}: {error}", self.label(index));
    }

    fn on_batch_complete(&self, students: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {students} students marked ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Formats {
    csv: bool,
    json: bool,
    html: bool,
}

fn parse_formats(format: &str) -> Result<Formats> {
    let mut formats = Formats::default();
    for fmt in format.split(',').map(str::trim) {
        match fmt {
            "csv" => formats.csv = true,
            "json" => formats.json = true,
            "html" => formats.html = true,
            "all" => {
                formats = Formats {
                    csv: true,
                    json: true,
                    html: true,
                }
            }
            other => {
                anyhow::bail!("unknown output format: '{other}' (expected csv, json, html or all)")
            }
        }
    }
    Ok(formats)
}

pub async fn execute(
    summary_path: PathBuf,
    locators: Vec<String>,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: String,
    policy: Option<PolicyKind>,
) -> Result<()> {
    anyhow::ensure!(!locators.is_empty(), "at least one source is required");
    let formats = parse_formats(&format)?;

    // Load config and apply command-line overrides
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(kind) = policy {
        config.scoring.policy = kind;
    }
    tracing::debug!(?config, "effective configuration");

    let remarker = Remarker::from_config(&config.markup, &config.scoring)?;

    // Acquire every document before marking
    let sources: Vec<Source> = locators.iter().map(|l| Source::parse(l)).collect();
    let loader = DocumentLoader::new(&config.fetch)?;
    eprintln!(
        "remark v{}: marking {} reports with the {} policy",
        env!("CARGO_PKG_VERSION"),
        sources.len(),
        remarker.policy().name()
    );
    let pages = load_all(&loader, &sources, config.fetch.parallelism).await?;
    let documents: Vec<HtmlDocument> = pages.iter().map(|p| HtmlDocument::parse(p)).collect();

    let reporter = ConsoleReporter { sources: &sources };
    let outcome = remarker
        .process_all(documents.iter().map(HtmlDocument::root), &reporter)
        .map_err(|e| {
            let failed = sources[e.index].to_string();
            anyhow::Error::new(e).context(format!("failed to mark {failed}"))
        })?;

    print_summary(&outcome.summary);

    // Save outputs
    write_summary_csv(&outcome.summary, &summary_path)?;
    eprintln!("Summary saved to: {}", summary_path.display());

    if formats.csv {
        let paths = write_student_csvs(&outcome.reports, &config.output_dir)?;
        for path in &paths {
            tracing::debug!("wrote {}", path.display());
        }
        eprintln!(
            "Student tables: {} files in {}",
            paths.len(),
            config.output_dir.display()
        );
    }

    if formats.json || formats.html {
        let run = outcome.into_run_report(remarker.policy().name());
        if formats.json {
            let path = config.output_dir.join("report.json");
            run.save_json(&path)?;
            eprintln!("Results saved to: {}", path.display());
        }
        if formats.html {
            let path = config.output_dir.join("summary.html");
            write_html_report(&run, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Name", "Max mark", "Mark", "Percentage"]);

    for row in &summary.rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.max_mark),
            Cell::new(row.actual_mark),
            Cell::new(format!("{:.2}%", row.percentage)),
        ]);
    }

    eprintln!("\n{table}");
    if let Some(mean) = summary.mean_percentage() {
        eprintln!("Mean: {mean:.2}%");
    }
}
