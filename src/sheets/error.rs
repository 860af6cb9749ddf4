//! Error types for remote collection operations.

use std::fmt;

use thiserror::Error;

use super::protocol::Action;

/// Coarse classification of a [`SheetsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetsErrorKind {
    /// No backend URL is configured.
    NotConfigured,
    /// Connection, DNS, TLS, or transport failure.
    Network,
    /// The request exceeded its time budget and was aborted.
    Timeout,
    /// The backend answered but reported a failure.
    Backend,
}

impl fmt::Display for SheetsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotConfigured => "not_configured",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Backend => "backend",
        };
        write!(f, "{label}")
    }
}

/// Errors returned by [`CollectionClient`](super::CollectionClient).
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The backend base URL is not configured.
    #[error("spreadsheet backend is not configured ({action} on {collection})")]
    NotConfigured {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
    },

    /// Transport-level failure.
    #[error("network error during {action} on {collection}: {source}")]
    Network {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request was aborted after the per-request timeout.
    #[error("timeout during {action} on {collection}")]
    Timeout {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
    },

    /// The backend returned a non-success HTTP status.
    #[error("HTTP {status} during {action} on {collection}")]
    HttpStatus {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
        /// The HTTP status code.
        status: u16,
    },

    /// The backend reported an `{ "error": ... }` payload.
    #[error("backend error during {action} on {collection}: {message}")]
    Backend {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
        /// Message supplied by the backend.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response during {action} on {collection}: {source}")]
    Decode {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
        /// The JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The outgoing payload could not be encoded as a JSON object.
    #[error("cannot encode payload for {action} on {collection}: {reason}")]
    Payload {
        /// Target collection.
        collection: &'static str,
        /// Requested action.
        action: Action,
        /// Why the payload was rejected.
        reason: String,
    },
}

impl SheetsError {
    /// Creates a not-configured error.
    #[must_use]
    pub fn not_configured(collection: &'static str, action: Action) -> Self {
        Self::NotConfigured { collection, action }
    }

    /// Creates a network or timeout error from a reqwest error.
    #[must_use]
    pub fn transport(collection: &'static str, action: Action, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { collection, action }
        } else {
            Self::Network {
                collection,
                action,
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(collection: &'static str, action: Action, status: u16) -> Self {
        Self::HttpStatus {
            collection,
            action,
            status,
        }
    }

    /// Creates a backend-reported error.
    pub fn backend(collection: &'static str, action: Action, message: impl Into<String>) -> Self {
        Self::Backend {
            collection,
            action,
            message: message.into(),
        }
    }

    /// Creates a decoding error.
    #[must_use]
    pub fn decode(collection: &'static str, action: Action, source: serde_json::Error) -> Self {
        Self::Decode {
            collection,
            action,
            source,
        }
    }

    /// Creates a payload encoding error.
    pub fn payload(collection: &'static str, action: Action, reason: impl Into<String>) -> Self {
        Self::Payload {
            collection,
            action,
            reason: reason.into(),
        }
    }

    /// Classifies this error into one of the coarse failure kinds.
    ///
    /// HTTP status, decode, and payload failures count as backend failures:
    /// the request reached the backend and the exchange was rejected.
    #[must_use]
    pub fn kind(&self) -> SheetsErrorKind {
        match self {
            Self::NotConfigured { .. } => SheetsErrorKind::NotConfigured,
            Self::Network { .. } => SheetsErrorKind::Network,
            Self::Timeout { .. } => SheetsErrorKind::Timeout,
            Self::HttpStatus { .. }
            | Self::Backend { .. }
            | Self::Decode { .. }
            | Self::Payload { .. } => SheetsErrorKind::Backend,
        }
    }

    /// Message suitable for end users. Backend details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self.kind() {
            SheetsErrorKind::NotConfigured => "This feature is temporarily unavailable.",
            _ => "Something went wrong. Please try again later.",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display_carries_message() {
        let error = SheetsError::backend("Blog", Action::Create, "Missing column: title");
        let msg = error.to_string();
        assert!(msg.contains("create"), "Expected action in: {msg}");
        assert!(msg.contains("Blog"), "Expected collection in: {msg}");
        assert!(msg.contains("Missing column: title"), "Expected message in: {msg}");
        assert_eq!(error.kind(), SheetsErrorKind::Backend);
    }

    #[test]
    fn test_timeout_display() {
        let error = SheetsError::Timeout {
            collection: "Events",
            action: Action::GetAll,
        };
        assert!(error.to_string().contains("timeout"));
        assert_eq!(error.kind(), SheetsErrorKind::Timeout);
    }

    #[test]
    fn test_public_message_hides_backend_details() {
        let error = SheetsError::backend("Subscribers", Action::Create, "Sheet quota exceeded");
        assert!(!error.public_message().contains("quota"));
    }

    #[test]
    fn test_not_configured_kind() {
        let error = SheetsError::not_configured("Popups", Action::Delete);
        assert_eq!(error.kind(), SheetsErrorKind::NotConfigured);
        assert!(error.to_string().contains("not configured"));
    }
}
