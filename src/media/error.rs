//! Error types for media host operations.

use thiserror::Error;

/// Errors that can occur while fetching or signing media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Media credentials are not configured, so nothing can be signed.
    #[error("media host credentials are not configured")]
    NotConfigured,

    /// The stored URL is not a media host resource URL.
    #[error("not a recognizable media URL: {url}")]
    UnrecognizedUrl {
        /// The URL that could not be decomposed.
        url: String,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The media host answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// The URL that returned an error status.
        url: String,
        /// The upstream HTTP status code.
        status: u16,
    },

    /// Writing the streamed body failed.
    #[error("IO error streaming {url}: {source}")]
    Io {
        /// The URL whose body was being written.
        url: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an upstream status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an unrecognized media URL error.
    pub fn unrecognized_url(url: impl Into<String>) -> Self {
        Self::UnrecognizedUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            url: url.into(),
            source,
        }
    }

    /// The upstream status code, when the failure carries one.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_and_accessor() {
        let error = MediaError::status("https://res.example.com/a.pdf", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("https://res.example.com/a.pdf"), "Expected URL in: {msg}");
        assert_eq!(error.upstream_status(), Some(404));
    }

    #[test]
    fn test_non_status_errors_have_no_upstream_status() {
        assert_eq!(MediaError::NotConfigured.upstream_status(), None);
        assert_eq!(MediaError::invalid_url("nope").upstream_status(), None);
    }
}
