// End-of-run reports

use crate::crawl::{CrawlSummary, extract_url_path};
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render `summary` in the requested format. Colour is only applied to text reports.
pub fn render_report(
    summary: &CrawlSummary,
    format: ReportFormat,
    color: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary, color)),
        ReportFormat::Json => generate_json_report(summary),
    }
}

pub fn generate_text_report(summary: &CrawlSummary, color: bool) -> String {
    let rule = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
    let mut report = String::new();

    report.push_str(rule);
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Start URL: {}\n", summary.start_url));
    report.push_str(&format!("  Workers: {}\n", summary.threads));
    report.push_str(&format!("  Pages visited: {}\n", summary.pages_visited()));
    report.push_str(&format!("  Comment fetches: {}\n", summary.comments_fetched()));
    if summary.comments_failed() > 0 {
        let failed = format!("  Comment fetches failed: {}", summary.comments_failed());
        if color {
            report.push_str(&failed.yellow().to_string());
        } else {
            report.push_str(&failed);
        }
        report.push('\n');
    }
    report.push_str(&format!("  Total requests: {}\n", summary.total_requests));
    report.push_str(&format!(
        "  Elapsed: {:.2}s ({:.1} req/s)\n",
        summary.elapsed.as_secs_f64(),
        summary.requests_per_second()
    ));
    report.push('\n');
    report.push_str(rule);
    report.push('\n');

    report.push_str("## Pages\n");
    for (idx, page) in summary.pages.iter().enumerate() {
        let status = if color {
            colorize_status(page.status_code)
        } else {
            page.status_code.to_string()
        };

        let mut target = extract_url_path(&page.url);
        if let Some(query) = url::Url::parse(&page.url).ok().and_then(|u| u.query().map(str::to_string)) {
            target.push('?');
            target.push_str(&query);
        }

        let mut line = format!(
            "  {:>3}. {} {}  {} comments, {}ms",
            idx + 1,
            status,
            target,
            page.comments_fetched,
            page.response_time.as_millis()
        );
        if page.comments_failed > 0 {
            line.push_str(&format!(", {} failed", page.comments_failed));
        }

        report.push_str(&line);
        report.push('\n');
    }
    report.push('\n');

    report
}

pub fn generate_json_report(summary: &CrawlSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "pagestorm",
                "version": env!("CARGO_PKG_VERSION"),
                "format": "json"
            },
            "summary": {
                "start_url": summary.start_url,
                "workers": summary.threads,
                "pages_visited": summary.pages_visited(),
                "comments_fetched": summary.comments_fetched(),
                "comments_failed": summary.comments_failed(),
                "total_requests": summary.total_requests,
                "elapsed_seconds": summary.elapsed.as_secs_f64(),
                "requests_per_second": summary.requests_per_second()
            },
            "pages": summary.pages
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn colorize_status(status_code: u16) -> String {
    let code = status_code.to_string();
    match status_code {
        100..=199 => code.white().to_string(),
        200..=299 => code.green().to_string(),
        300..=399 => code.cyan().to_string(),
        400..=499 => code.yellow().to_string(),
        500..=599 => code.red().to_string(),
        _ => code,
    }
}
