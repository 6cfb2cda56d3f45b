use cinefeed_core::decode;
use cinefeed_core::types::{CatalogItem, Genre, MediaKind, Page, TitleDetail, TrailerVideo};
use serde_json::Value;

use crate::params::Params;
use crate::{CatalogError, TransportError};

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Anything that can answer catalog API requests.
///
/// Implementors provide `request`; the typed operations are built on top of
/// it and decode responses with the validating decoders in `cinefeed_core`.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    fn language(&self) -> &str {
        DEFAULT_LANGUAGE
    }

    fn include_adult(&self) -> bool {
        false
    }

    /// GET `path` (relative, e.g. `discover/movie`) with `params`, returning the JSON body.
    async fn request(&self, path: &str, params: &Params) -> Result<Value, TransportError>;

    /// Genre lookup table for a media kind.
    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, CatalogError> {
        let path = format!("genre/{}/list", kind.api_segment());
        let params = Params::new().with("language", self.language());
        let data = self.request(&path, &params).await?;
        Ok(decode::genre_list(&data)?)
    }

    /// Most popular titles of `kind` tagged with `genre_id`.
    async fn discover(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
    ) -> Result<Page<CatalogItem>, CatalogError> {
        let path = format!("discover/{}", kind.api_segment());
        let params = Params::new()
            .with("with_genres", vec![genre_id])
            .with("page", page)
            .with("language", self.language())
            .with("sort_by", "popularity.desc");
        let data = self.request(&path, &params).await?;
        Ok(decode::item_page(&data, kind)?)
    }

    /// One page of a single-kind listing such as `trending/movie/week` or `movie/top_rated`.
    async fn list_page(
        &self,
        path: &str,
        kind: MediaKind,
        page: u32,
    ) -> Result<Page<CatalogItem>, CatalogError> {
        let params = Params::new()
            .with("page", page)
            .with("language", self.language());
        let data = self.request(path, &params).await?;
        Ok(decode::item_page(&data, kind)?)
    }

    /// Multi-kind search with non-media hits dropped. Counts are upstream's.
    async fn search_multi(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<CatalogItem>, CatalogError> {
        let params = Params::new()
            .with("query", query)
            .with("page", page)
            .with("language", self.language())
            .with("include_adult", self.include_adult());
        let data = self.request("search/multi", &params).await?;
        Ok(decode::media_page(&data)?)
    }

    /// Detail view with videos and credits appended.
    async fn title_detail(&self, kind: MediaKind, id: u64) -> Result<TitleDetail, CatalogError> {
        let path = format!("{}/{id}", kind.api_segment());
        let params = Params::new()
            .with("append_to_response", "videos,credits")
            .with("language", self.language());
        let data = self.request(&path, &params).await?;
        Ok(decode::title_detail(&data, kind)?)
    }

    /// Every video upstream lists for a title, playable or not.
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<TrailerVideo>, CatalogError> {
        let path = format!("{}/{id}/videos", kind.api_segment());
        let params = Params::new().with("language", self.language());
        let data = self.request(&path, &params).await?;
        Ok(decode::video_list(&data)?)
    }
}

/// Endpoint paths are non-empty, relative, and carry no query or fragment.
pub fn validate_endpoint(path: &str) -> Result<(), TransportError> {
    let invalid = path.trim().is_empty()
        || path.starts_with('/')
        || path.contains("://")
        || path.contains(['?', '#', ' '])
        || path.split('/').any(|seg| seg.is_empty() || seg == "..");
    if invalid {
        return Err(TransportError::InvalidEndpoint(path.to_string()));
    }
    Ok(())
}
