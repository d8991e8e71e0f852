//! Error types for service record validation and parsing.

use thiserror::Error;

/// Errors returned while constructing service record values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceDomainError {
    /// The upstream URL is missing or empty after trimming.
    #[error("upstream_url is required")]
    MissingUpstreamUrl,

    /// The upstream URL exceeds the 200-character storage limit.
    #[error("upstream_url exceeds {max} characters (got {length})")]
    UpstreamUrlTooLong {
        /// Character count of the rejected value.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// The upstream URL is not a valid absolute URL.
    #[error("invalid upstream_url '{0}'")]
    InvalidUpstreamUrl(String),

    /// The HTTP method is not one of the supported methods.
    #[error(transparent)]
    InvalidMethod(#[from] ParseHttpMethodError),

    /// The service payload could not be decoded.
    #[error("malformed service payload: {0}")]
    MalformedPayload(String),
}

/// Error returned while parsing HTTP methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseHttpMethodError(pub String);

/// Error returned while parsing service kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service kind: {0}")]
pub struct ParseServiceKindError(pub String);
