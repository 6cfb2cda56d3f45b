use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Connection settings for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    /// `None` makes every request fail with `MissingCredential`.
    pub api_key: Option<String>,
    pub language: String,
    pub include_adult: bool,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            language: "en-US".to_string(),
            include_adult: false,
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: non_empty(api_key.into()),
            ..Default::default()
        }
    }

    /// Read `CINEFEED_TMDB_KEY`, `CINEFEED_TMDB_BASE_URL`, `CINEFEED_LANGUAGE`
    /// and `CINEFEED_TIMEOUT_SECS`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("CINEFEED_TMDB_BASE_URL")
                .and_then(non_empty)
                .unwrap_or(defaults.base_url),
            api_key: lookup("CINEFEED_TMDB_KEY").and_then(non_empty),
            language: lookup("CINEFEED_LANGUAGE")
                .and_then(non_empty)
                .unwrap_or(defaults.language),
            include_adult: defaults.include_adult,
            timeout_secs: lookup("CINEFEED_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
