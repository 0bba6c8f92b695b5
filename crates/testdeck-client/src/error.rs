use std::time::Duration;

use thiserror::Error;

/// Errors that can be returned by testdeck-client operations.
///
/// The `Display` output doubles as the failure description carried by
/// synthesised `error` snapshots, so it is kept short and human-readable.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An HTTP request failed (connection refused, TLS, client-side deadline, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task id cannot address a status endpoint (empty or whitespace-only).
    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),

    /// The configured API base could not be turned into a request URL.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// A request did not resolve within its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    /// Returns `true` for failures where the backend was never reached or
    /// never answered.
    pub fn is_unreachable(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            ClientError::Timeout(_) => true,
            _ => false,
        }
    }
}
