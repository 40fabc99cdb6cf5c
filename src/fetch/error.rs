//! Error types for the fetch-and-decode pipeline.
//!
//! Every variant collapses into [`FetchStatus::Error`](super::FetchStatus::Error)
//! once it reaches the controller; the distinction only survives in logs.

use thiserror::Error;

/// Errors that can occur while fetching or decoding an image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be turned into a request.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Failed to reach the host or read the response.
    #[error("Connection failed to '{url}': {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Server answered with a non-success status.
    #[error("Unexpected HTTP status {status} from '{url}'")]
    Status { url: String, status: u16 },

    /// Response body exceeded the configured limit.
    #[error("Response too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Server answered with an empty body.
    #[error("Empty response body from '{url}'")]
    EmptyPayload { url: String },

    /// Failed while streaming the response body.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Payload is not a decodable image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The worker running the fetch panicked or was torn down.
    #[error("Fetch task failed: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// Short machine-readable tag, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Connection { .. } => "connection_error",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Status { .. } => "http_status",
            FetchError::TooLarge { .. } => "too_large",
            FetchError::EmptyPayload { .. } => "empty_payload",
            FetchError::Body(_) => "body_error",
            FetchError::Decode(_) => "decode_error",
            FetchError::TaskFailed(_) => "task_failed",
        }
    }
}
