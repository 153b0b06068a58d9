use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One listing page processed by the crawl loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVisit {
    pub url: String,
    pub status_code: u16,
    pub response_time: Duration,
    pub comments_found: usize,
    pub comments_fetched: usize,
    pub comments_failed: usize,
    pub next_page: Option<String>,
}

impl PageVisit {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            response_time: Duration::from_secs(0),
            comments_found: 0,
            comments_fetched: 0,
            comments_failed: 0,
            next_page: None,
        }
    }

    /// Requests this page accounted for: the page itself plus every comment fetch that completed.
    pub fn requests(&self) -> usize {
        1 + self.comments_fetched
    }
}
