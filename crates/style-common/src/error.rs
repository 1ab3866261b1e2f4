//! Error types for style compilation.

use thiserror::Error;

/// Result type alias using StyleError.
pub type StyleResult<T> = Result<T, StyleError>;

/// Compile-time errors. Nothing downstream of a successful compile
/// produces one of these.
#[derive(Debug, Error)]
pub enum StyleError {
    // === Document Errors ===
    #[error("Failed to parse style document: {0}")]
    ParseError(String),

    #[error("Unsupported style version {0} (expected 8)")]
    UnsupportedVersion(u64),

    #[error("Duplicate layer id: {0}")]
    DuplicateLayerId(String),

    #[error("Layer '{layer}' references missing layer '{missing}'")]
    DanglingReference { layer: String, missing: String },

    // === Expression Errors ===
    #[error("Malformed filter: {0}")]
    MalformedFilter(String),

    #[error("Malformed function for property '{property}': {message}")]
    MalformedFunction { property: String, message: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Context ===
    #[error("Layer '{layer}': {source}")]
    InLayer {
        layer: String,
        #[source]
        source: Box<StyleError>,
    },
}

impl StyleError {
    pub fn malformed_function(property: &str, message: impl Into<String>) -> Self {
        StyleError::MalformedFunction {
            property: property.to_string(),
            message: message.into(),
        }
    }
}

impl StyleError {
    /// Attach the id of the layer being compiled.
    pub fn in_layer(self, layer: &str) -> Self {
        StyleError::InLayer {
            layer: layer.to_string(),
            source: Box::new(self),
        }
    }

    /// The error with any layer context stripped.
    pub fn root(&self) -> &StyleError {
        match self {
            StyleError::InLayer { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        StyleError::ParseError(err.to_string())
    }
}
