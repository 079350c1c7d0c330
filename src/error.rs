//! Error handling for cops-client

use crate::rejection::Rejection;
use thiserror::Error;

/// Main error type for cops-client operations
#[derive(Error, Debug)]
pub enum CopsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request rejected: {0}")]
    Rejected(Rejection),

    #[error("No API base URL: the `url` session cookie is not set")]
    MissingBaseUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cookie store error: {0}")]
    CookieStore(String),
}

/// Result type alias for cops-client operations
pub type Result<T> = std::result::Result<T, CopsError>;
