//! Error types for API calls.

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`] requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building or sending the request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The response status differs from the expected one.
    #[error("unexpected status: expected {expected}, got {actual}, body: {body_preview}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body_preview: String,
    },
    /// The response body could not be decoded as JSON.
    #[error("response is not JSON (status {status}): {source}")]
    NotJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    /// The body reports a business-level failure.
    #[error("business check failed: {field}={value}, message: {message}")]
    Business {
        field: &'static str,
        value: String,
        message: String,
    },
}
