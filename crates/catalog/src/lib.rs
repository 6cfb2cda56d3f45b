pub mod aggregate;
pub mod config;
pub mod params;
pub mod search;
pub mod section;
pub mod source;
#[cfg(test)]
mod testing;
pub mod tmdb;
pub mod trailers;

use cinefeed_core::DecodeError;
use thiserror::Error;

pub use aggregate::{CategoryShelves, aggregate_by_category, genre_shelves};
pub use config::CatalogConfig;
pub use params::{ParamValue, Params};
pub use search::{SearchEngine, TypeAhead};
pub use section::{SectionLoader, SectionState};
pub use source::CatalogSource;
pub use tmdb::TmdbClient;
pub use trailers::fetch_trailers;

/// A request to the catalog API did not produce a JSON document.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("invalid endpoint path: {0:?}")]
    InvalidEndpoint(String),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not JSON: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
