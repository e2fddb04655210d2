//! Error types for GitHub client.

use thiserror::Error;

/// Result type for GitHub client operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Configuration error (invalid base URL, client construction failed)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response other than 404
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The addressed resource does not exist (REST 404 or GraphQL NOT_FOUND)
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// GraphQL request succeeded at the HTTP level but reported errors
    #[error("GraphQL error: {0}")]
    GraphQL(String),

    /// Parse error (invalid JSON, unexpected response shape)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The caller abandoned the request before it completed
    #[error("Request cancelled")]
    Cancelled,
}

impl GithubError {
    /// True for 404 / NOT_FOUND responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GithubError::NotFound { .. })
    }
}
