//! Genre shelves: one discovery request per genre, joined before returning.

use std::future::Future;

use cinefeed_core::types::{CatalogItem, Genre, MediaKind, Page};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::CatalogError;
use crate::source::CatalogSource;

/// Items per genre, in the order the genres were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryShelves {
    shelves: Vec<(Genre, Vec<CatalogItem>)>,
}

impl CategoryShelves {
    pub fn len(&self) -> usize {
        self.shelves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelves.is_empty()
    }

    /// Items for the first genre called `name`.
    pub fn get(&self, name: &str) -> Option<&[CatalogItem]> {
        self.shelves
            .iter()
            .find(|(g, _)| g.name == name)
            .map(|(_, items)| items.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shelves.iter().map(|(g, _)| g.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Genre, &[CatalogItem])> {
        self.shelves.iter().map(|(g, items)| (g, items.as_slice()))
    }
}

/// Fetch every category concurrently and wait for all of them.
///
/// A failed category gets an empty shelf; the failure goes to `on_failure`
/// and the log, never into the result. No request is made for zero categories.
pub async fn aggregate_by_category<F, Fut>(
    categories: &[Genre],
    fetch: F,
    per_category_limit: usize,
    mut on_failure: impl FnMut(&Genre, &CatalogError),
) -> CategoryShelves
where
    F: Fn(&Genre) -> Fut,
    Fut: Future<Output = Result<Page<CatalogItem>, CatalogError>>,
{
    if categories.is_empty() {
        return CategoryShelves::default();
    }

    let results = join_all(categories.iter().map(&fetch)).await;

    let mut shelves = Vec::with_capacity(categories.len());
    let mut failed = 0usize;
    for (genre, result) in categories.iter().zip(results) {
        let items = match result {
            Ok(page) => {
                let mut items = page.items;
                items.truncate(per_category_limit);
                items
            }
            Err(e) => {
                failed += 1;
                warn!(
                    genre = %genre.name,
                    genre_id = genre.id,
                    error = %e,
                    "category fetch failed"
                );
                on_failure(genre, &e);
                Vec::new()
            }
        };
        shelves.push((genre.clone(), items));
    }

    debug!(categories = categories.len(), failed, "category aggregation complete");
    CategoryShelves { shelves }
}

/// Genre list for `kind`, then the top `per_category_limit` titles of each genre.
pub async fn genre_shelves(
    source: &dyn CatalogSource,
    kind: MediaKind,
    per_category_limit: usize,
) -> CategoryShelves {
    let genres = match source.genres(kind).await {
        Ok(genres) => genres,
        Err(e) => {
            warn!(kind = %kind, error = %e, "genre list fetch failed");
            return CategoryShelves::default();
        }
    };

    aggregate_by_category(
        &genres,
        |g: &Genre| source.discover(kind, g.id, 1),
        per_category_limit,
        |_, _| {},
    )
    .await
}
