use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of catalog entry. Upstream calls series `tv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    /// Path segment used by the upstream API (`movie/...`, `tv/...`).
    pub fn api_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }

    /// Map an upstream `media_type` value. Anything else (`person`, ...) is `None`.
    pub fn from_media_type(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie or series record. Identity is `(kind, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub genre_ids: Vec<u64>,
}

impl CatalogItem {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// One-decimal rating, or `N/A` when upstream has no usable score.
    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }
}

/// Search hits are catalog items; non-media kinds never decode into one.
pub type SearchResult = CatalogItem;

pub fn rating_label(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) => format!("{v:.1}"),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One page of a paginated upstream listing.
///
/// `total_pages` and `total_results` are the upstream counts and may not match
/// `items.len()` once results have been filtered or truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> Page<T> {
    /// `{ items: [], page_number: 1, total_pages: 0 }`
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        !self.items.is_empty() && self.page_number < self.total_pages
    }
}

/// Video category as reported by upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoType {
    Trailer,
    Teaser,
    Clip,
    Featurette,
    BehindTheScenes,
    Bloopers,
    OpeningCredits,
    Other(String),
}

impl VideoType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Trailer" => Self::Trailer,
            "Teaser" => Self::Teaser,
            "Clip" => Self::Clip,
            "Featurette" => Self::Featurette,
            "Behind the Scenes" => Self::BehindTheScenes,
            "Bloopers" => Self::Bloopers,
            "Opening Credits" => Self::OpeningCredits,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Trailer => "Trailer",
            Self::Teaser => "Teaser",
            Self::Clip => "Clip",
            Self::Featurette => "Featurette",
            Self::BehindTheScenes => "Behind the Scenes",
            Self::Bloopers => "Bloopers",
            Self::OpeningCredits => "Opening Credits",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for VideoType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<VideoType> for String {
    fn from(t: VideoType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const YOUTUBE_SITE: &str = "YouTube";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerVideo {
    /// Opaque id on the hosting platform.
    pub key: String,
    pub site: String,
    pub video_type: VideoType,
    pub name: String,
}

impl TrailerVideo {
    /// Embeddable on YouTube and either a trailer or a teaser.
    pub fn is_playable(&self) -> bool {
        self.site == YOUTUBE_SITE
            && matches!(self.video_type, VideoType::Trailer | VideoType::Teaser)
    }
}

pub fn playable_trailers(videos: impl IntoIterator<Item = TrailerVideo>) -> Vec<TrailerVideo> {
    videos.into_iter().filter(TrailerVideo::is_playable).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: u32,
}

/// Full detail view of a movie or series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetail {
    pub item: CatalogItem,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub cast: Vec<CastMember>,
    pub trailers: Vec<TrailerVideo>,
}

impl TitleDetail {
    pub fn runtime_label(&self) -> String {
        match self.runtime_minutes {
            Some(m) => format!("{m} min"),
            None => "N/A".to_string(),
        }
    }

    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
