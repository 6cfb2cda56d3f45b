//! "Load more" sections backed by one paginated endpoint.

use std::sync::Arc;

use cinefeed_core::types::{CatalogItem, MediaKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::CatalogError;
use crate::source::CatalogSource;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

/// Section lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionState {
    Idle,
    Loading,
    Loaded,
    LoadingMore,
    /// No more pages upstream.
    Exhausted,
    Failed,
}

impl SectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Loaded => "Loaded",
            Self::LoadingMore => "LoadingMore",
            Self::Exhausted => "Exhausted",
            Self::Failed => "Failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }
}

impl std::fmt::Display for SectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates pages of one endpoint in order. Loads take `&mut self`, so a
/// section can never have two loads outstanding.
pub struct SectionLoader {
    source: Arc<dyn CatalogSource>,
    endpoint: String,
    kind: MediaKind,
    items_per_page: usize,
    state: SectionState,
    items: Vec<CatalogItem>,
    page: u32,
    has_more: bool,
}

impl SectionLoader {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        endpoint: impl Into<String>,
        kind: MediaKind,
    ) -> Self {
        Self {
            source,
            endpoint: endpoint.into(),
            kind,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            state: SectionState::Idle,
            items: Vec::new(),
            page: 0,
            has_more: false,
        }
    }

    pub fn with_items_per_page(mut self, cap: usize) -> Self {
        self.items_per_page = cap;
        self
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Last page successfully loaded, 0 before the first.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch page 1 and replace whatever was accumulated. Dropping the
    /// future before it resolves leaves the section as it was.
    pub async fn load_first_page(&mut self) -> Result<(), CatalogError> {
        let pending = PendingLoad::begin(&mut self.state, SectionState::Loading);

        let result = self.source.list_page(&self.endpoint, self.kind, 1).await;
        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let mut items = page.items;
                items.truncate(self.items_per_page);
                self.items = items;
                self.page = 1;
                self.has_more = fetched > 0 && page.page_number < page.total_pages;
                pending.settle(settled_state(self.has_more));
                info!(
                    endpoint = %self.endpoint,
                    items = self.items.len(),
                    total_pages = page.total_pages,
                    "section loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "section load failed");
                self.has_more = false;
                pending.settle(SectionState::Failed);
                Err(e)
            }
        }
    }

    /// Append the next page. Returns how many items were added; outside
    /// `Loaded` with more pages this is a no-op returning 0 without a request.
    /// A failure moves to `Failed` and keeps the accumulated items. A dropped
    /// load returns to `Loaded` so it can be retried.
    pub async fn load_next_page(&mut self) -> Result<usize, CatalogError> {
        if self.state != SectionState::Loaded || !self.has_more {
            return Ok(0);
        }

        let next = self.page + 1;
        let pending = PendingLoad::begin(&mut self.state, SectionState::LoadingMore);

        let result = self.source.list_page(&self.endpoint, self.kind, next).await;
        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let added = fetched.min(self.items_per_page);
                self.items.extend(page.items.into_iter().take(added));
                self.page = next;
                self.has_more = fetched > 0 && next < page.total_pages;
                pending.settle(settled_state(self.has_more));
                info!(
                    endpoint = %self.endpoint,
                    page = next,
                    added,
                    has_more = self.has_more,
                    "section page appended"
                );
                Ok(added)
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, page = next, error = %e, "section load failed");
                self.has_more = false;
                pending.settle(SectionState::Failed);
                Err(e)
            }
        }
    }
}

fn settled_state(has_more: bool) -> SectionState {
    if has_more {
        SectionState::Loaded
    } else {
        SectionState::Exhausted
    }
}

/// In-flight marker for one load. Puts the previous state back when dropped
/// without being settled.
struct PendingLoad<'a> {
    state: &'a mut SectionState,
    previous: SectionState,
    settled: bool,
}

impl<'a> PendingLoad<'a> {
    fn begin(state: &'a mut SectionState, loading: SectionState) -> Self {
        let previous = std::mem::replace(state, loading);
        Self {
            state,
            previous,
            settled: false,
        }
    }

    fn settle(mut self, next: SectionState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = self.previous;
        }
    }
}
