pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{
    crawl_options_from_matches, handle_crawl, init_tracing, report_format_from_matches,
    write_report,
};

// Re-export crawl functionality from pagestorm-core
pub use pagestorm_core::crawl::{CrawlOptions, CrawlProgressCallback, CrawlSummary, execute_crawl};
