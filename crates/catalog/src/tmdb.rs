//! HTTP client for the TMDB v3 API.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::params::{CREDENTIAL_KEY, Params};
use crate::source::{CatalogSource, validate_endpoint};
use crate::TransportError;

pub struct TmdbClient {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: CatalogConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TransportError::Network)?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, TransportError> {
        Self::new(CatalogConfig::from_env())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl CatalogSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn language(&self) -> &str {
        &self.config.language
    }

    fn include_adult(&self) -> bool {
        self.config.include_adult
    }

    async fn request(&self, path: &str, params: &Params) -> Result<Value, TransportError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(TransportError::MissingCredential)?;
        validate_endpoint(path)?;

        if params.get(CREDENTIAL_KEY).is_some() {
            warn!(path, "dropping caller-supplied credential parameter");
        }

        let url = self.url(path);
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&params.to_query(api_key))
            .send()
            .await
            .map_err(TransportError::Network)?;

        if !resp.status().is_success() {
            return Err(TransportError::Status(resp.status()));
        }

        resp.json().await.map_err(TransportError::Body)
    }
}
