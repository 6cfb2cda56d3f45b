//! Multi-kind search and the type-ahead controller that drives it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cinefeed_core::types::{Page, SearchResult};
use tracing::{debug, warn};

use crate::source::CatalogSource;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_MIN_CHARS: usize = 3;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Search over movies and series. Never fails: errors yield an empty page.
#[derive(Clone)]
pub struct SearchEngine {
    source: Arc<dyn CatalogSource>,
    max_results: usize,
}

impl SearchEngine {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Blank queries return `Page::empty()` without touching the network.
    /// Non-media hits are dropped before truncation; `total_pages` and
    /// `total_results` stay as upstream reported them.
    pub async fn search(&self, query: &str, page: u32) -> Page<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Page::empty();
        }

        match self.source.search_multi(query, page.max(1)).await {
            Ok(mut results) => {
                results.items.truncate(self.max_results);
                debug!(
                    query,
                    kept = results.items.len(),
                    total_results = results.total_results,
                    "search complete"
                );
                results
            }
            Err(e) => {
                warn!(query, error = %e, "search failed");
                Page::empty()
            }
        }
    }
}

/// Last-query-wins front end for search-as-you-type.
///
/// Every `submit` takes a new sequence number. A response is surfaced only if
/// no newer `submit` (or `reset`) happened while it was pending; stale
/// responses come back as `None` regardless of arrival order.
pub struct TypeAhead {
    engine: SearchEngine,
    latest: AtomicU64,
    min_chars: usize,
    debounce: Duration,
}

impl TypeAhead {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            latest: AtomicU64::new(0),
            min_chars: DEFAULT_MIN_CHARS,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// `Duration::ZERO` searches immediately.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Current input text. Inputs shorter than the minimum clear the results
    /// without a request.
    pub async fn submit(&self, text: &str) -> Option<Page<SearchResult>> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().chars().count() < self.min_chars {
            return self.is_current(seq).then(Page::empty);
        }

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if !self.is_current(seq) {
                debug!(seq, "query superseded during debounce");
                return None;
            }
        }

        let page = self.engine.search(text, 1).await;
        if self.is_current(seq) {
            Some(page)
        } else {
            debug!(seq, "discarding stale search response");
            None
        }
    }

    /// Invalidate anything in flight, e.g. when the search box closes.
    pub fn reset(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}
