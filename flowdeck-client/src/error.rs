//! Error types and failure normalization for the Flowdeck client
//!
//! Every failure a network call can produce — non-2xx responses, timeouts,
//! refused connections, requests that never left the client — is funneled
//! into the single [`ClientError`] enumeration before a caller sees it.
//! Callers branch on the message/status accessors, never on the underlying
//! `reqwest::Error`, which is retained only as a `source()` diagnostic.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message shown when the server could not be reached at all
pub const CONNECTIVITY_MESSAGE: &str = "network error, unable to reach the server";

/// Message shown when a request exceeded its deadline
pub const TIMEOUT_MESSAGE: &str = "request timed out, check the network and try again later";

/// The only error surfaced by client methods
#[derive(Debug, Error)]
pub enum ClientError {
    /// A response arrived with a non-2xx status
    #[error("{message}")]
    Server {
        /// HTTP status code of the response
        status: u16,
        /// Server-supplied message, or a synthesized fallback
        message: String,
        /// Application-level code reserved by the API; never populated today
        business_code: Option<String>,
    },

    /// The request was sent but no response came back
    #[error("{message}")]
    Transport {
        message: String,
        /// True when the failure was the request deadline elapsing
        timed_out: bool,
        #[source]
        cause: reqwest::Error,
    },

    /// The request could not be built or dispatched at all
    #[error("{message}")]
    Construction {
        message: String,
        #[source]
        cause: reqwest::Error,
    },

    /// A 2xx response whose body could not be decoded
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        #[source]
        cause: reqwest::Error,
    },
}

/// Minimal view of an error response body
///
/// Error bodies reuse the standard envelope, but only `message` matters
/// here and malformed or truncated bodies are common, so everything else
/// is ignored.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ClientError {
    /// Build a `Server` error from a non-2xx response's status and raw body
    ///
    /// Uses the body's `message` field when it parses and is non-empty,
    /// otherwise synthesizes a status-based fallback.
    pub(crate) fn server_error(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("request failed, status: {}", status));

        Self::Server {
            status,
            message,
            business_code: None,
        }
    }

    /// HTTP status of the failed request, when a response was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Application-level error code, when the server supplied one
    pub fn business_code(&self) -> Option<&str> {
        match self {
            Self::Server { business_code, .. } => business_code.as_deref(),
            _ => None,
        }
    }

    /// Check if this error is a request deadline expiry
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Check if this error is a "not found" response
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// Check if this error is a server-side error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for ClientError {
    /// Classify a transport-level failure
    ///
    /// Non-2xx responses never reach this conversion; they are handled from
    /// the response body before any `reqwest::Error` exists. What remains is
    /// classified in priority order: request construction faults, deadline
    /// expiry, undecodable success bodies, then generic connectivity loss.
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Construction {
                message: err.to_string(),
                cause: err,
            }
        } else if err.is_timeout() {
            Self::Transport {
                message: TIMEOUT_MESSAGE.to_string(),
                timed_out: true,
                cause: err,
            }
        } else if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
                cause: err,
            }
        } else {
            Self::Transport {
                message: CONNECTIVITY_MESSAGE.to_string(),
                timed_out: false,
                cause: err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_server_error_uses_body_message() {
        let err = ClientError::server_error(404, br#"{"message": "not found"}"#);
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.http_status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.business_code(), None);
    }

    #[test]
    fn test_server_error_unparsable_body_falls_back() {
        let err = ClientError::server_error(500, b"<html>Internal Server Error</html>");
        assert_eq!(err.to_string(), "request failed, status: 500");
        assert_eq!(err.http_status(), Some(500));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_server_error_empty_message_falls_back() {
        let err = ClientError::server_error(502, br#"{"message": ""}"#);
        assert_eq!(err.to_string(), "request failed, status: 502");
    }

    #[test]
    fn test_full_envelope_body_message_wins() {
        let body = br#"{
            "statusCode": 400,
            "message": "cron expression is invalid",
            "data": null,
            "timestamp": "2025-01-01T00:00:00Z"
        }"#;
        let err = ClientError::server_error(400, body);
        assert_eq!(err.to_string(), "cron expression is invalid");
    }

    #[tokio::test]
    async fn test_timeout_classified_distinctly() {
        // Bound but never served: the connection opens, then nothing answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let raw = client
            .get(format!("http://{}/ping", addr))
            .send()
            .await
            .unwrap_err();
        let err = ClientError::from(raw);

        assert!(err.is_timeout());
        assert_eq!(err.to_string(), TIMEOUT_MESSAGE);
        assert_eq!(err.http_status(), None);
        drop(listener);
    }

    #[tokio::test]
    async fn test_refused_connection_is_generic_connectivity() {
        // Bind to grab a free port, then drop it so connections are refused.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        let raw = client
            .get(format!("http://{}/ping", addr))
            .send()
            .await
            .unwrap_err();
        let err = ClientError::from(raw);

        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
        assert_eq!(err.http_status(), None);
    }

    #[tokio::test]
    async fn test_unbuildable_request_keeps_source_text() {
        let client = reqwest::Client::new();
        // Relative URL with no base: the request cannot be constructed.
        let raw = client.get("no-such-scheme").send().await.unwrap_err();
        let source_text = raw.to_string();
        let err = ClientError::from(raw);

        assert!(matches!(err, ClientError::Construction { .. }));
        assert_eq!(err.to_string(), source_text);
        assert_eq!(err.http_status(), None);
    }
}
