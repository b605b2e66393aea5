//! Mastodon REST API client

pub mod mastodon;

use thiserror::Error;

pub use mastodon::MastodonClient;

/// Error for API calls that reached the server but were rejected
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status from the instance
    #[error("{method} {endpoint} returned {status}: {message}")]
    Status {
        /// HTTP method of the failed request
        method: &'static str,
        /// API endpoint path
        endpoint: String,
        /// HTTP status code
        status: reqwest::StatusCode,
        /// Server-supplied error message, if any
        message: String,
    },
}
