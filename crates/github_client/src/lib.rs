//! Crate for reading repository contents through the GitHub REST API.
//!
//! This crate wraps the GitHub "contents" endpoint with consistent
//! authentication and error semantics. Directory listings and single-file
//! fetches go through [`RepositoryContentsClient`], which [`GitHubClient`]
//! implements on top of `octocrab`.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub mod contents;
pub mod errors;

pub use contents::{EntryType, FileContentPayload, TreeEntry};
pub use errors::Error;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Environment variable consulted for a personal access token.
pub const GITHUB_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Default per-request timeout applied to every contents call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for reading repository contents.
///
/// This is the seam the repository walker depends on, so mock
/// implementations can stand in for GitHub in tests.
#[async_trait]
pub trait RepositoryContentsClient: Send + Sync {
    /// Lists the entries of a directory.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `path` - Directory path within the repository, without a leading slash.
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The repository or directory does not exist.
    /// * `Error::RateLimitExceeded` - The provider refused the request because of quota.
    /// * `Error::ProviderError` - Any other non-success status.
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>, Error>;

    /// Fetches the decoded text of a single file.
    ///
    /// Returns an empty string when the provider payload carries no content.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`RepositoryContentsClient::list_directory`].
    async fn get_file_content(&self, owner: &str, repo: &str, path: &str)
        -> Result<String, Error>;
}

/// A client for reading repository contents from the GitHub API.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
    request_timeout: Duration,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` around an already configured `Octocrab`.
    ///
    /// Authentication (or the lack of it) is decided when the `Octocrab`
    /// instance is built, see [`create_client`].
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the per-request timeout in use.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    async fn get_json<R>(&self, route: &str, context: &str) -> Result<R, Error>
    where
        R: serde::de::DeserializeOwned + Send,
    {
        debug!(route = route, "Making API call");

        let request = self.client.get::<R, _, ()>(route, None::<&()>);
        let response: OctocrabResult<R> = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                warn!(
                    route = route,
                    timeout_seconds = self.request_timeout.as_secs(),
                    "GitHub API request timed out"
                );
                Error::Timeout(self.request_timeout.as_secs())
            })?;

        response.map_err(|e| translate_octocrab_error(context, e))
    }
}

#[async_trait]
impl RepositoryContentsClient for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>, Error> {
        let route = contents_route(owner, repo, path)?;
        let entries: Vec<TreeEntry> = self
            .get_json(&route, "Failed to list directory contents")
            .await?;

        debug!(count = entries.len(), "Retrieved directory listing");
        Ok(entries)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, Error> {
        let route = contents_route(owner, repo, path)?;
        let payload: FileContentPayload = self
            .get_json(&route, "Failed to fetch file content")
            .await?;

        if payload.content.is_none() {
            debug!("File payload has no content field");
        }
        payload.decode_text()
    }
}

/// Resolves the token to use for GitHub requests.
///
/// Sources are checked in order: the explicit argument, the
/// `GITHUB_TOKEN` environment variable, then the session value. Blank
/// values are skipped.
pub fn resolve_token(explicit: Option<&str>, session: Option<&str>) -> Option<SecretString> {
    let from_env = std::env::var(GITHUB_TOKEN_ENV_VAR).ok();

    let token = [explicit, from_env.as_deref(), session]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(|token| SecretString::from(token.to_string()));
    token
}

/// Creates an `Octocrab` client, optionally authenticated with a token.
///
/// # Arguments
///
/// * `base_uri` - Alternative API root, e.g. a GitHub Enterprise host or a test server.
/// * `token` - Personal access token sent as the `Authorization` header.
///
/// # Errors
///
/// Returns `Error::AuthError` when the base URI cannot be parsed or the
/// client cannot be built.
#[instrument(skip(token), fields(authenticated = token.is_some()))]
pub fn create_client(base_uri: Option<&str>, token: Option<&SecretString>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder();

    if let Some(uri) = base_uri {
        builder = builder.base_uri(uri).map_err(|e| {
            error!(base_uri = uri, error = %e, "Invalid GitHub API base URI");
            Error::AuthError(format!("Invalid GitHub API base URI '{}': {}", uri, e))
        })?;
    }

    if let Some(token) = token {
        builder = builder.personal_token(token.expose_secret().to_string());
    } else {
        info!("No GitHub token configured, using unauthenticated requests");
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build Octocrab client");
        Error::AuthError("Failed to build the GitHub client.".to_string())
    })
}

/// Creates an unauthenticated `Octocrab` client.
///
/// Unauthenticated requests share a much lower rate limit.
pub fn create_anonymous_client() -> Result<Octocrab, Error> {
    create_client(None, None)
}

/// Builds the contents route with each path segment percent-encoded.
fn contents_route(owner: &str, repo: &str, path: &str) -> Result<String, Error> {
    let mut url = Url::parse("https://api.github.com/")
        .map_err(|e| Error::AuthError(format!("Failed to build request URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| Error::InvalidResponse)?
        .extend(["repos", owner, repo, "contents"])
        .extend(path.split('/').filter(|segment| !segment.is_empty()));

    Ok(url.path().to_string())
}

fn translate_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    let translated = match &e {
        octocrab::Error::GitHub { source, .. } => match source.status_code {
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
            status => Error::ProviderError(format!("{}: {}", status, source.message)),
        },
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        other => Error::ProviderError(other.to_string()),
    };

    log_octocrab_error(message, e);
    translated
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            if status == 404 {
                // Missing paths are an expected outcome for callers probing a tree.
                debug!(status, error_message = source.message, "{}. Not found", message)
            } else {
                error!(
                    status,
                    error_message = source.message,
                    "{}. Received an error from GitHub",
                    message
                )
            }
        }
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
