//! Error types for repository analysis.
//!
//! The analyzer never retries. Every failure surfaces here and the shell is
//! the only place that turns an error kind into user guidance.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum Error {
    /// The supplied URL does not name a GitHub repository.
    #[error("Invalid GitHub repository URL: {0}")]
    InvalidReference(String),

    /// The routing root or a listed path does not exist.
    #[error("Repository or directory not found")]
    NotFound,

    /// The provider quota is exhausted.
    #[error("GitHub API rate limit exceeded. Retry later or supply a personal access token")]
    RateLimited,

    /// Any other non-success answer from the provider, verbatim.
    #[error("{0}")]
    ProviderError(String),

    /// The analysis completed but produced nothing to visualize.
    #[error("{0}")]
    EmptyResult(String),

    /// The walk needed more remote calls than the configured budget allows.
    #[error("Request budget of {0} GitHub API calls exhausted before the walk completed")]
    RequestBudgetExhausted(usize),

    /// The contents client could not be created.
    #[error("Failed to create GitHub client: {0}")]
    Client(String),
}

impl From<github_client::Error> for Error {
    fn from(value: github_client::Error) -> Self {
        match value {
            github_client::Error::NotFound => Error::NotFound,
            github_client::Error::RateLimitExceeded => Error::RateLimited,
            github_client::Error::ProviderError(message) => Error::ProviderError(message),
            github_client::Error::AuthError(message) => Error::Client(message),
            other => Error::ProviderError(other.to_string()),
        }
    }
}
