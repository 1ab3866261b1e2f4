//! Error types for loading styles and their linked resources.

use style_common::StyleError;
use thiserror::Error;

/// Result type alias using LinkError.
pub type LinkResult<T> = Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    // === Transport Errors ===
    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    // === Payload Errors ===
    #[error("Invalid JSON from {url}: {message}")]
    InvalidJson { url: String, message: String },

    #[error("Invalid image from {url}: {message}")]
    InvalidImage { url: String, message: String },

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    // === Document Errors ===
    #[error(transparent)]
    Style(#[from] StyleError),
}

impl LinkError {
    pub fn request(url: &str, err: impl std::fmt::Display) -> Self {
        LinkError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Style(StyleError::from(err))
    }
}
