//! remark CLI: re-mark saved or fetched multiple-choice exam reports.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use remark_core::config::PolicyKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "remark",
    version,
    about = "Re-mark multiple-choice exam reports"
)]
struct Cli {
    /// Where to write the batch summary CSV
    summary: PathBuf,

    /// Exam report pages: local paths or http(s) URLs
    #[arg(required = true, num_args = 1..)]
    sources: Vec<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for per-student tables and extra reports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format: csv, json, html, all (comma-separated)
    #[arg(long, default_value = "csv")]
    format: String,

    /// Scoring policy: penalty, all-or-nothing
    #[arg(long)]
    policy: Option<PolicyKind>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("remark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = commands::run::execute(
        cli.summary,
        cli.sources,
        cli.config,
        cli.output_dir,
        cli.format,
        cli.policy,
    )
    .await;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
