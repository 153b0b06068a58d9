pub use pagestorm_scanner::crawler::{DEFAULT_COMMENT_CLASS, DEFAULT_NEXT_ACCESSKEY, DEFAULT_WORKERS};
use pagestorm_scanner::{Crawler, PageVisit, RequestCallback};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_START_PATH: &str = "/r/politics";

/// Options for configuring a crawl operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    pub base_url: String,
    pub start_path: String,
    pub threads: usize,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<usize>,
    pub comment_class: String,
    pub next_accesskey: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_path: DEFAULT_START_PATH.to_string(),
            threads: DEFAULT_WORKERS,
            timeout_secs: None,
            max_pages: None,
            comment_class: DEFAULT_COMMENT_CLASS.to_string(),
            next_accesskey: DEFAULT_NEXT_ACCESSKEY.to_string(),
        }
    }
}

impl CrawlOptions {
    pub fn start_url(&self) -> String {
        format!("{}{}", self.base_url, self.start_path)
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub start_url: String,
    pub threads: usize,
    pub pages: Vec<PageVisit>,
    pub total_requests: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn pages_visited(&self) -> usize {
        self.pages.len()
    }

    pub fn comments_fetched(&self) -> usize {
        self.pages.iter().map(|p| p.comments_fetched).sum()
    }

    pub fn comments_failed(&self) -> usize {
        self.pages.iter().map(|p| p.comments_failed).sum()
    }

    pub fn requests_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_requests as f64 / secs
        } else {
            0.0
        }
    }
}

/// The progress line printed after every completed request
pub fn format_request_count(count: usize) -> String {
    format!("Request count: {}", count)
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
///
/// Every completed request is reported through `progress_callback` as a
/// `Request count: <n>` line. The first listing-page failure aborts the run
/// and is returned as the error.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlSummary, String> {
    let start_url = options.start_url();
    let CrawlOptions {
        base_url,
        start_path,
        threads,
        timeout_secs,
        max_pages,
        comment_class,
        next_accesskey,
    } = options;

    let mut crawler = Crawler::new(&base_url)
        .map_err(|e| e.to_string())?
        .with_workers(threads)
        .with_comment_class(&comment_class)
        .with_next_accesskey(&next_accesskey);

    if let Some(secs) = timeout_secs {
        crawler = crawler.with_timeout(Duration::from_secs(secs));
    }
    if let Some(max_pages) = max_pages {
        crawler = crawler.with_max_pages(max_pages);
    }
    if let Some(callback) = progress_callback {
        let request_callback: RequestCallback = Arc::new(move |count: usize, _url: String| {
            callback(format_request_count(count));
        });
        crawler = crawler.with_request_callback(request_callback);
    }

    let started = Instant::now();
    let pages = crawler
        .crawl(&start_path)
        .await
        .map_err(|e| e.to_string())?;
    let elapsed = started.elapsed();

    let summary = CrawlSummary {
        start_url,
        threads: crawler.workers(),
        pages,
        total_requests: crawler.request_count(),
        elapsed,
    };

    info!(
        "{} pages, {} requests in {:.2}s",
        summary.pages_visited(),
        summary.total_requests,
        summary.elapsed.as_secs_f64()
    );

    Ok(summary)
}
