use crate::counter::RequestCounter;
use crate::error::{Result, ScanError};
use crate::page::{self, Listing};
use crate::result::PageVisit;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_COMMENT_CLASS: &str = "post_comments";
pub const DEFAULT_NEXT_ACCESSKEY: &str = "N";

/// Called after every completed request with the new counter value and the URL fetched.
pub type RequestCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called once per listing page, after its comment fan-out has drained.
pub type PageCallback = Arc<dyn Fn(&PageVisit) + Send + Sync>;

pub struct Crawler {
    base_url: String,
    workers: usize,
    timeout: Option<Duration>,
    max_pages: Option<usize>,
    comment_class: String,
    next_accesskey: String,
    user_agent: String,
    counter: Arc<RequestCounter>,
    request_callback: Option<RequestCallback>,
    page_callback: Option<PageCallback>,
}

impl Crawler {
    /// `base_url` is kept verbatim; every discovered href is appended to it as-is.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                base_url,
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            workers: DEFAULT_WORKERS,
            timeout: None,
            max_pages: None,
            comment_class: DEFAULT_COMMENT_CLASS.to_string(),
            next_accesskey: DEFAULT_NEXT_ACCESSKEY.to_string(),
            user_agent: format!("pagestorm/{}", env!("CARGO_PKG_VERSION")),
            counter: Arc::new(RequestCounter::new()),
            request_callback: None,
            page_callback: None,
        })
    }

    /// Width of the per-page comment pool. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_comment_class(mut self, class: &str) -> Self {
        self.comment_class = class.to_string();
        self
    }

    pub fn with_next_accesskey(mut self, accesskey: &str) -> Self {
        self.next_accesskey = accesskey.to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_counter(mut self, counter: Arc<RequestCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_request_callback(mut self, callback: RequestCallback) -> Self {
        self.request_callback = Some(callback);
        self
    }

    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn request_count(&self) -> usize {
        self.counter.get()
    }

    /// Walks the listing pages starting at `base_url + start_path`.
    ///
    /// Each page is fetched and parsed, its comment links are fetched through a
    /// pool of `workers` concurrent requests, and the loop only moves to the
    /// next page once that pool has drained. The walk ends when a page has no
    /// next-page link or `max_pages` pages have been visited.
    ///
    /// A failed listing fetch aborts the walk. Failed comment fetches are
    /// logged and counted on the page's [`PageVisit`] but never abort it.
    /// Status codes are not checked: an error page is parsed like any other.
    pub async fn crawl(&self, start_path: &str) -> Result<Vec<PageVisit>> {
        let client = self.build_client()?;
        let start_url = page::join_base(&self.base_url, start_path);

        info!(
            "Starting crawl of {} with {} workers",
            start_url, self.workers
        );

        let mut visits: Vec<PageVisit> = Vec::new();
        let mut current = Some(start_url);

        while let Some(url) = current.take() {
            if let Some(max_pages) = self.max_pages
                && visits.len() >= max_pages
            {
                info!("Page limit of {} reached, stopping before {}", max_pages, url);
                break;
            }

            let (mut visit, listing) = self.fetch_listing(&client, &url).await?;
            let Listing {
                comment_links,
                next_page,
            } = listing;

            // Only counts outlive the iteration; the links are dropped here.
            let (fetched, failed) = self.fan_out(&client, &comment_links).await;
            visit.comments_found = comment_links.len();
            visit.comments_fetched = fetched;
            visit.comments_failed = failed;
            visit.next_page = next_page.clone();
            drop(comment_links);

            if let Some(ref callback) = self.page_callback {
                callback(&visit);
            }
            visits.push(visit);

            current = next_page;
        }

        info!(
            "Crawl complete. Visited {} pages, {} requests",
            visits.len(),
            self.counter.get()
        );
        Ok(visits)
    }

    fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(self.user_agent.as_str())
            .pool_max_idle_per_host(self.workers)
            .tcp_keepalive(Duration::from_secs(60));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }

    /// Sequential fetch of one listing page.
    async fn fetch_listing(&self, client: &Client, url: &str) -> Result<(PageVisit, Listing)> {
        debug!("Fetching listing {}", url);

        let start = Instant::now();
        let response = client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;
        let response_time = start.elapsed();

        self.record_request(url);

        let listing = page::parse_listing(
            &body,
            url,
            &self.base_url,
            &self.comment_class,
            &self.next_accesskey,
        )?;

        let mut visit = PageVisit::new(url.to_string());
        visit.status_code = status_code;
        visit.response_time = response_time;

        Ok((visit, listing))
    }

    /// Fetches every URL with at most `workers` requests in flight and waits
    /// for all of them. Returns (completed, failed).
    async fn fan_out(&self, client: &Client, urls: &[String]) -> (usize, usize) {
        if urls.is_empty() {
            return (0, 0);
        }

        debug!("Dispatching {} comment fetches", urls.len());

        let fetches = urls.iter().map(move |url| async move {
            match Self::fetch_comment(client, url).await {
                Ok(()) => {
                    self.record_request(url);
                    true
                }
                Err(e) => {
                    warn!("Comment fetch failed for {}: {}", url, e);
                    false
                }
            }
        });

        let outcomes: Vec<bool> = stream::iter(fetches)
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let fetched = outcomes.iter().filter(|ok| **ok).count();
        (fetched, outcomes.len() - fetched)
    }

    async fn fetch_comment(client: &Client, url: &str) -> Result<()> {
        debug!("Fetching comments {}", url);
        let response = client.get(url).send().await?;
        // Drain the body so the server does the full amount of work.
        response.bytes().await?;
        Ok(())
    }

    fn record_request(&self, url: &str) {
        let count = self.counter.increment();
        debug!("Request {} completed: {}", count, url);
        if let Some(ref callback) = self.request_callback {
            callback(count, url.to_string());
        }
    }
}
