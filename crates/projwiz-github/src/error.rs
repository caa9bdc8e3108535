//! Error types for projwiz-github

use thiserror::Error;

/// Result type alias using projwiz-github's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Hosted-repository API errors
#[derive(Error, Debug)]
pub enum Error {
    /// No usable credential was supplied
    #[error("Repository credential is not configured")]
    NotConfigured,

    /// The API answered with an unexpected status
    #[error("API request to {endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an unexpected-status error
    pub fn status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }
}
