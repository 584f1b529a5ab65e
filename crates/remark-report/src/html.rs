//! HTML summary report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use remark_core::report::{BatchSummary, RunReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn grade_class(percentage: f64) -> &'static str {
    if percentage >= 70.0 {
        "high"
    } else if percentage >= 40.0 {
        "mid"
    } else {
        "low"
    }
}

/// Generate an HTML page from a run report.
pub fn generate_html(report: &RunReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>remark summary</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>remark summary</h1>\n");
    let mean = report
        .summary
        .mean_percentage()
        .map(|m| format!("{m:.1}%"))
        .unwrap_or_else(|| "-".to_string());
    html.push_str(&format!(
        "<p class=\"meta\">{} students | policy <strong>{}</strong> | mean {} | {}</p>\n",
        report.summary.len(),
        html_escape(&report.policy),
        mean,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary table
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\" id=\"summary\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Name</th><th onclick=\"sortTable(1)\">Max mark</th><th onclick=\"sortTable(2)\">Mark</th><th onclick=\"sortTable(3)\">Percentage</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in &report.summary.rows {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td></tr>\n",
            grade_class(row.percentage),
            html_escape(&row.name),
            row.max_mark,
            row.actual_mark,
            row.percentage,
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.summary.is_empty() {
        html.push_str(&generate_bar_chart(&report.summary));
    }
    html.push_str("</section>\n");

    // Per-student question tables
    html.push_str("<section class=\"students\">\n");
    html.push_str("<h2>Students</h2>\n");
    for student in &report.students {
        html.push_str(&format!(
            "<details>\n<summary>{} ({} / {})</summary>\n",
            html_escape(&student.name),
            student.totals.actual_mark,
            student.totals.max_mark
        ));
        html.push_str("<table class=\"questions\">\n");
        html.push_str("<thead><tr><th>#</th><th>Answers</th><th>Valid answers</th><th>Correct</th><th>Incorrect</th><th>Mark</th></tr></thead>\n<tbody>\n");
        for (i, row) in student.rows.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                i + 1,
                row.total_options,
                row.total_correct,
                row.selected_correct,
                row.selected_incorrect,
                row.mark
            ));
        }
        html.push_str("</tbody></table>\n</details>\n");
    }
    html.push_str("</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &RunReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(summary: &BatchSummary) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 220;

    let total_height = summary.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 70,
        total_height
    );

    for (i, row) in summary.rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        // Negative totals draw as an empty bar.
        let fraction = (row.percentage / 100.0).clamp(0.0, 1.0);
        let width = (fraction * max_width as f64) as usize;

        let color = match grade_class(row.percentage) {
            "high" => "#22c55e",
            "mid" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&row.name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            row.percentage
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --high: #dcfce7; --mid: #fef9c3; --low: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --high: #064e3b; --mid: #713f12; --low: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.high { background: var(--high); }
.mid { background: var(--mid); }
.low { background: var(--low); }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('summary');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const numeric = col > 0;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = numeric ? parseFloat(va) - parseFloat(vb) : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
