use thiserror::Error;

/// Upstream JSON did not have the shape a catalog record requires.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unsupported media type `{0}`")]
    UnsupportedKind(String),

    #[error("invalid date in `{field}`: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}
