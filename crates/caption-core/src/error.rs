//! Error types for caption generation.
//!
//! Every failure a generator can hit falls into one of three buckets: the
//! provider call failed, the provider answered with something that doesn't
//! fit the expected shape, or the local image couldn't be read. The
//! sentinel-returning entry points collapse all of them; the `try_*`
//! variants hand them back to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for caption operations.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Network, auth, rate-limit, timeout, or non-success HTTP status
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        status_code: Option<u16>,
    },

    /// Response didn't match the expected structured shape
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Image file couldn't be read
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CaptionError {
    pub(crate) fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            status_code: None,
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for caption results.
pub type Result<T> = std::result::Result<T, CaptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = CaptionError::Io {
            path: PathBuf::from("/tmp/missing.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.jpg"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: CaptionError = ConfigError::ValidationError("bad".into()).into();
        assert!(matches!(err, CaptionError::Config(_)));
        assert!(err.to_string().contains("bad"));
    }
}
