use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use pagestorm_core::crawl::{CrawlOptions, CrawlProgressCallback, CrawlSummary, execute_crawl};
use pagestorm_core::print_banner;
use pagestorm_core::report::{ReportFormat, render_report, save_report};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout only carries request counts and the summary.
/// Filtered by `RUST_LOG`, `warn` when unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build crawl options from either the root command or the `crawl` subcommand
pub fn crawl_options_from_matches(args: &ArgMatches) -> CrawlOptions {
    let defaults = CrawlOptions::default();

    CrawlOptions {
        base_url: args
            .get_one::<String>("base-url")
            .cloned()
            .unwrap_or(defaults.base_url),
        start_path: args
            .get_one::<String>("start-path")
            .cloned()
            .unwrap_or(defaults.start_path),
        threads: args
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(defaults.threads),
        timeout_secs: args.get_one::<u64>("timeout").copied(),
        max_pages: args.get_one::<usize>("max-pages").copied(),
        comment_class: args
            .get_one::<String>("comment-class")
            .cloned()
            .unwrap_or(defaults.comment_class),
        next_accesskey: args
            .get_one::<String>("next-accesskey")
            .cloned()
            .unwrap_or(defaults.next_accesskey),
    }
}

pub fn report_format_from_matches(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

/// Render the summary and either save it to `output` or print it to stdout
pub fn write_report(
    summary: &CrawlSummary,
    format: ReportFormat,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let color = output.is_none() && std::io::stdout().is_terminal();
    let report = render_report(summary, format, color).context("Failed to render report")?;

    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }

    Ok(())
}

pub async fn handle_crawl(args: &ArgMatches) {
    let options = crawl_options_from_matches(args);
    let format = report_format_from_matches(args);
    let output = args.get_one::<PathBuf>("output");
    let quiet = args.get_flag("quiet");
    debug!("Crawl options: {:?}", options);

    if !quiet {
        print_banner();
        eprintln!("Crawling {}", options.start_url().bright_white());
        eprintln!("Workers: {}", options.threads);
        if let Some(max_pages) = options.max_pages {
            eprintln!("Max pages: {}", max_pages);
        }
        eprintln!();
    }

    let progress_callback: CrawlProgressCallback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let summary = match execute_crawl(options, Some(progress_callback)).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} Crawl failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if quiet {
        return;
    }

    eprintln!("\n{} Crawl complete!\n", "✓".green().bold());
    if let Err(e) = write_report(&summary, format, output) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
