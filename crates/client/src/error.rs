//! Error taxonomy for backend requests.
//!
//! Services never let these escape to the presentation layer for expected
//! failure modes; they fold them into a [`crate::MutationOutcome`] instead.
//! The distinctions matter for that folding: a server-reported message is
//! surfaced verbatim, everything else falls back to a per-operation
//! generic message.

use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (no usable response received).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The backend answered with a non-success status.
    ///
    /// `message` carries the server's error payload message when one was
    /// present; it is surfaced to the user verbatim.
    #[error("server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// JSON parsing of a response body failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be constructed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Map a `reqwest` failure, keeping timeouts distinct from other
    /// transport errors.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// The server-supplied error message, if the backend reported one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Product is out of stock".to_string()),
        };
        assert_eq!(err.to_string(), "server error (400): Product is out of stock");

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "server error (500): no message");
    }

    #[test]
    fn test_server_message_only_for_status_errors() {
        let err = ApiError::Status {
            status: 404,
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.server_message(), Some("Product not found"));

        assert_eq!(ApiError::Timeout.server_message(), None);
        assert_eq!(ApiError::RateLimited(5).server_message(), None);
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
