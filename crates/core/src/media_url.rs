//! URL builders for artwork on the image CDN and trailers on YouTube.

use crate::types::{CatalogItem, TrailerVideo};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Card posters.
pub const POSTER_SIZE: &str = "w500";
/// Search dropdown thumbnails.
pub const THUMB_SIZE: &str = "w200";
/// Hero backdrops and detail pages.
pub const ORIGINAL_SIZE: &str = "original";

/// `{base}/{size}{path}`; upstream paths already start with `/`.
pub fn image_url(base: &str, size: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}/{size}{path}")
    } else {
        format!("{base}/{size}/{path}")
    }
}

pub fn poster_url(item: &CatalogItem, size: &str) -> Option<String> {
    item.poster_path
        .as_deref()
        .map(|p| image_url(IMAGE_BASE, size, p))
}

pub fn backdrop_url(item: &CatalogItem, size: &str) -> Option<String> {
    item.backdrop_path
        .as_deref()
        .map(|p| image_url(IMAGE_BASE, size, p))
}

/// Poster, falling back to the backdrop.
pub fn thumbnail_url(item: &CatalogItem) -> Option<String> {
    item.poster_path
        .as_deref()
        .or(item.backdrop_path.as_deref())
        .map(|p| image_url(IMAGE_BASE, THUMB_SIZE, p))
}

pub fn youtube_thumbnail_url(video: &TrailerVideo) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video.key)
}

pub fn youtube_embed_url(video: &TrailerVideo) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1", video.key)
}

pub fn youtube_watch_url(video: &TrailerVideo) -> String {
    format!("https://www.youtube.com/watch?v={}", video.key)
}
