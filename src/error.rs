// src/error.rs
// =============================================================================
// Typed errors for the parts of the program that callers branch on.
//
// - FetchError: a page or image could not be downloaded. The crawler and the
//   downloader treat every variant as "skip and continue".
// - ConfigError: the settings are unusable. Reported once at startup.
// - CollageError: the collage could not be produced. NoImages and ZeroHeight
//   are the expected, non-crashing failures; the rest are codec or disk errors.
//
// The command handlers in main.rs use anyhow::Result and the ? operator, so
// all of these convert into anyhow::Error automatically.
// =============================================================================

use thiserror::Error;

/// Why a URL could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 404 Not Found or 410 Gone
    #[error("{url} not found (HTTP {status})")]
    NotFound { url: String, status: u16 },

    /// Any other non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// DNS, connection, TLS or body read failures
    #[error("could not fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("not a fetchable URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// True when the server answered but said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("no images for collage found")]
    NoImages,

    #[error("height of collage could not be 0")]
    ZeroHeight,

    #[error("image error for {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_transport() {
        let missing = FetchError::NotFound {
            url: "https://example.com/x".to_string(),
            status: 404,
        };
        let broken = FetchError::Transport {
            url: "https://example.com/x".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
    }

    #[test]
    fn test_messages_name_the_url() {
        let err = FetchError::Status {
            url: "https://example.com/page".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "https://example.com/page returned HTTP 500");
        assert_eq!(
            CollageError::ZeroHeight.to_string(),
            "height of collage could not be 0"
        );
    }
}
