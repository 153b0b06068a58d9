use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide count of completed HTTP requests, shared by the page loop and the comment workers.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicUsize,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the counter and returns the new value.
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
