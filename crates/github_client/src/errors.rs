//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when reading repository
//! contents through the GitHub API. The taxonomy is deliberately small: callers
//! mostly need to tell a missing path apart from an exhausted rate limit, and
//! both apart from everything else the provider can return.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// No variant is retried by the client. Each error is surfaced to the caller
/// as soon as the provider reports it.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_directory("owner", "repo", "app").await {
///     Ok(entries) => println!("{} entries", entries.len()),
///     Err(Error::NotFound) => eprintln!("Nothing at that path"),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded, supply a token"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication or GitHub client initialization failure.
    ///
    /// The contained string provides details about why the client could not
    /// be built (for example an unparseable base URI).
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned a response in an unexpected format.
    ///
    /// Typically raised when a directory listing was requested for a path
    /// that names a file, or when file content is not valid base64.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested repository or directory was not found (HTTP 404).
    #[error("Repository or directory not found")]
    NotFound,

    /// Any other non-success answer from GitHub.
    ///
    /// Carries the provider's status text or message verbatim.
    #[error("GitHub API error: {0}")]
    ProviderError(String),

    /// GitHub API rate limit has been exceeded (HTTP 403 or 429).
    #[error("GitHub API rate limit exceeded. Retry later or supply a personal access token")]
    RateLimitExceeded,

    /// The request did not complete within the configured number of seconds.
    #[error("GitHub API request timed out after {0} seconds")]
    Timeout(u64),
}
