//! Self-contained HTML report with client-side filtering

use crate::model::{CrawlResult, Severity};
use crate::output::traits::{OutputResult, ReportSink};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto,
           sans-serif; background: #0f172a; color: #e2e8f0; padding: 2rem; }
    h1 { font-size: 1.8rem; margin-bottom: 0.25rem; }
    .subtitle { color: #94a3b8; margin-bottom: 1.5rem; }
    .stats { display: flex; gap: 2rem; margin-bottom: 1.5rem; flex-wrap: wrap; }
    .stat { background: #1e293b; border-radius: 8px; padding: 1rem 1.5rem; }
    .stat-value { font-size: 1.5rem; font-weight: 700; }
    .stat-label { color: #94a3b8; font-size: 0.85rem; }
    .badges { margin-bottom: 1rem; }
    .badge { display: inline-block; padding: 0.2rem 0.6rem; border-radius: 4px;
             font-size: 0.75rem; font-weight: 600; color: white; margin: 2px; }
    .badge-cat { background: #334155; color: #e2e8f0; }
    .filters { margin-bottom: 1rem; display: flex; gap: 0.5rem; flex-wrap: wrap; }
    .filters select { background: #1e293b; color: #e2e8f0; border: 1px solid #334155;
                      padding: 0.4rem 0.8rem; border-radius: 6px; }
    table { width: 100%; border-collapse: collapse; }
    th { text-align: left; padding: 0.6rem 0.8rem; background: #1e293b;
         border-bottom: 2px solid #334155; font-size: 0.8rem;
         text-transform: uppercase; color: #94a3b8; }
    td { padding: 0.6rem 0.8rem; border-bottom: 1px solid #1e293b;
         font-size: 0.85rem; vertical-align: top; }
    tr:hover { background: #1e293b; }
    .desc { max-width: 350px; word-break: break-word; }
    .url { max-width: 250px; word-break: break-all; }
    .errors { margin-top: 2rem; color: #fca5a5; font-size: 0.85rem; }
    .errors li { margin-left: 1.5rem; }
    a { color: #60a5fa; text-decoration: none; }
    a:hover { text-decoration: underline; }
"#;

const FILTER_SCRIPT: &str = r#"
        function applyFilters() {
            const sev = document.getElementById('filterSeverity').value;
            const cat = document.getElementById('filterCategory').value;
            document.querySelectorAll('#bugTable tr').forEach(row => {
                const matchSev = !sev || row.dataset.severity === sev;
                const matchCat = !cat || row.dataset.category === cat;
                row.style.display = (matchSev && matchCat) ? '' : 'none';
            });
        }
"#;

/// Badge color for a severity
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "#dc2626",
        Severity::High => "#ea580c",
        Severity::Medium => "#ca8a04",
        Severity::Low => "#2563eb",
        Severity::Info => "#6b7280",
    }
}

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats a crawl result as a standalone HTML document
///
/// Every piece of text that came from a page (titles, descriptions, URLs,
/// errors) is escaped before interpolation.
pub fn format_html_report(result: &CrawlResult) -> String {
    let summary = result.summary();
    let start_url = escape_html(result.start_url());

    // Writing to a String cannot fail
    let mut bug_rows = String::new();
    for bug in result.bugs() {
        let url = escape_html(bug.url());
        let _ = write!(
            bug_rows,
            r#"
        <tr data-severity="{sev}" data-category="{cat}">
            <td><span class="badge" style="background:{color}">{sev_upper}</span></td>
            <td>{cat}</td>
            <td>{title}</td>
            <td class="desc">{desc}</td>
            <td class="url"><a href="{url}" target="_blank" rel="noopener">{url}</a></td>
        </tr>"#,
            sev = bug.severity().as_str(),
            cat = bug.category().as_str(),
            color = severity_color(bug.severity()),
            sev_upper = bug.severity().as_str().to_uppercase(),
            title = escape_html(bug.title()),
            desc = escape_html(bug.description()),
            url = url,
        );
    }

    let mut severity_badges = String::new();
    for severity in Severity::all() {
        let count = summary.severity_count(severity);
        if count > 0 {
            let _ = write!(
                severity_badges,
                r#"<span class="badge" style="background:{}">{}: {}</span> "#,
                severity_color(severity),
                severity.as_str().to_uppercase(),
                count
            );
        }
    }

    let mut category_badges = String::new();
    for (category, count) in summary.categories_by_count() {
        let _ = write!(
            category_badges,
            r#"<span class="badge badge-cat">{}: {}</span> "#,
            escape_html(category),
            count
        );
    }

    let mut severity_options = String::new();
    for severity in Severity::all() {
        let _ = write!(
            severity_options,
            r#"
            <option value="{}">{}</option>"#,
            severity.as_str(),
            capitalize(severity.as_str())
        );
    }

    let mut category_options = String::new();
    for category in summary.by_category.keys() {
        let category = escape_html(category);
        let _ = write!(
            category_options,
            r#"
            <option value="{0}">{0}</option>"#,
            category
        );
    }

    let mut error_section = String::new();
    if !result.errors().is_empty() {
        let _ = write!(
            error_section,
            r#"
    <div class="errors">
        <h2>Crawler Errors ({})</h2>
        <ul>"#,
            result.errors().len()
        );
        for err in result.errors() {
            let _ = write!(error_section, "\n            <li>{}</li>", escape_html(err));
        }
        error_section.push_str("\n        </ul>\n    </div>");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Vibe Crawler Report - {start_url}</title>
<style>{style}</style>
</head>
<body>
    <h1>🐛 Vibe Crawler Report</h1>
    <p class="subtitle">{start_url}</p>

    <div class="stats">
        <div class="stat">
            <div class="stat-value">{pages}</div>
            <div class="stat-label">Pages Visited</div>
        </div>
        <div class="stat">
            <div class="stat-value">{total}</div>
            <div class="stat-label">Bugs Found</div>
        </div>
        <div class="stat">
            <div class="stat-value">{urgent}</div>
            <div class="stat-label">Critical + High</div>
        </div>
    </div>

    <div class="badges">{severity_badges}</div>
    <div class="badges">{category_badges}</div>

    <div class="filters">
        <select id="filterSeverity" onchange="applyFilters()">
            <option value="">All Severities</option>{severity_options}
        </select>
        <select id="filterCategory" onchange="applyFilters()">
            <option value="">All Categories</option>{category_options}
        </select>
    </div>

    <table>
        <thead>
            <tr>
                <th>Severity</th>
                <th>Category</th>
                <th>Title</th>
                <th>Description</th>
                <th>URL</th>
            </tr>
        </thead>
        <tbody id="bugTable">{bug_rows}
        </tbody>
    </table>
{error_section}
    <script>{script}</script>
</body>
</html>
"#,
        start_url = start_url,
        style = STYLE,
        pages = result.pages_visited(),
        total = summary.total_bugs,
        urgent = summary.urgent_count(),
        severity_badges = severity_badges,
        category_badges = category_badges,
        severity_options = severity_options,
        category_options = category_options,
        bug_rows = bug_rows,
        error_section = error_section,
        script = FILTER_SCRIPT,
    )
}

/// Writes the HTML report to `output_path`
pub fn write_html_report(result: &CrawlResult, output_path: &Path) -> OutputResult<()> {
    let html = format_html_report(result);

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;

    tracing::info!("HTML report saved to {}", output_path.display());
    Ok(())
}

/// Sink that writes the HTML report to a file
#[derive(Debug, Clone)]
pub struct HtmlSink {
    path: PathBuf,
}

impl HtmlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for HtmlSink {
    fn name(&self) -> &str {
        "html"
    }

    fn emit(&self, result: &CrawlResult) -> OutputResult<()> {
        write_html_report(result, &self.path)
    }
}
