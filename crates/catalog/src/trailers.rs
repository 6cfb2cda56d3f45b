use cinefeed_core::types::{MediaKind, TrailerVideo, playable_trailers};
use tracing::{debug, warn};

use crate::source::CatalogSource;

/// Playable trailers and teasers for a title; empty when there are none or
/// the lookup fails.
pub async fn fetch_trailers(
    source: &dyn CatalogSource,
    kind: MediaKind,
    id: u64,
) -> Vec<TrailerVideo> {
    match source.videos(kind, id).await {
        Ok(videos) => {
            let total = videos.len();
            let trailers = playable_trailers(videos);
            debug!(kind = %kind, id, total, playable = trailers.len(), "videos fetched");
            trailers
        }
        Err(e) => {
            warn!(kind = %kind, id, error = %e, "video lookup failed");
            Vec::new()
        }
    }
}
