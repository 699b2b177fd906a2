pub mod client;

pub use client::{ApiClient, ClientConfig, PollApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid poll id '{0}'")]
    InvalidPollId(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("poll not found or expired")]
    NotFound,
    #[error("request to {url} returned {status}")]
    Status { status: u16, url: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for failures caused by the poll being absent or purged.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}
