pub mod decode;
pub mod error;
pub mod media_url;
pub mod types;

pub use error::DecodeError;
