//! HTTP client errors.

use std::time::Duration;

use reqwest::{StatusCode, header::InvalidHeaderValue};
use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The configured base URL is unusable.
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    /// The CSRF token cannot be sent as a header value.
    #[error("csrf token is not a valid header value")]
    InvalidToken(#[source] InvalidHeaderValue),

    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response arrived in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body was not the expected JSON.
    #[error("could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Rejected {
        /// Response status
        status: StatusCode,

        /// Backend message, or the status reason when none was sent
        message: String,
    },
}

impl HttpError {
    /// Whether the failure means the backend never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}
