//! Error types for the colormate library
//!
//! Detection itself never surfaces these to callers: degenerate input is
//! absorbed by the fallback chain in [`crate::core::detection`]. They exist for
//! the outer surfaces (configuration files, model assets, the CLI) and for the
//! internal fault path that is converted into the "unknown" result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for colormate operations
pub type Result<T> = std::result::Result<T, ColorError>;

#[derive(Error, Debug)]
pub enum ColorError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image data is structurally invalid (e.g. buffer length does not match dimensions)
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// Configuration value out of range
    #[error("Invalid configuration: {parameter} = {value}")]
    Config { parameter: String, value: String },

    /// Learned model asset or inference failure
    #[error("Model error: {message}")]
    Model { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ColorError {
    pub fn config(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::Config {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }
}
