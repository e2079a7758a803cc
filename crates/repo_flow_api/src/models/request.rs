//! HTTP request type definitions

use repo_flow_core::{parse_github_url, RepositoryReference};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// Body of every analysis request.
///
/// # Example
///
/// ```json
/// { "repoUrl": "https://github.com/vercel/app-playground" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyzeRepositoryRequest {
    pub repo_url: String,
}

impl AnalyzeRepositoryRequest {
    /// Parses the URL into a repository reference.
    ///
    /// # Errors
    ///
    /// * `ApiError::Validation` when the URL is blank.
    /// * `ApiError::Analysis` with `InvalidReference` when it is not a GitHub URL.
    pub fn repository_reference(&self) -> Result<RepositoryReference, ApiError> {
        let url = self.repo_url.trim();
        if url.is_empty() {
            return Err(ApiError::validation("repoUrl", "must not be empty"));
        }

        Ok(parse_github_url(url)?)
    }
}
