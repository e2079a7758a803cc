//! Repository references parsed from user supplied URLs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;

/// Host accepted by [`parse_github_url`].
pub const GITHUB_HOST: &str = "github.com";

/// Owner and name of the repository under analysis.
///
/// Derived once from a URL and never changed during an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryReference {
    pub owner: String,
    pub repo: String,
}

impl RepositoryReference {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepositoryReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_github_url(s)
    }
}

/// Parses a GitHub repository URL into its owner and repository name.
///
/// Anything after the second path segment (`/tree/main/...`, query strings,
/// fragments) is ignored.
///
/// # Errors
///
/// Returns `Error::InvalidReference` when the string is not a URL, the host is
/// not `github.com`, or fewer than two path segments are present.
///
/// # Examples
///
/// ```rust
/// use repo_flow_core::parse_github_url;
///
/// let reference = parse_github_url("https://github.com/vercel/commerce/tree/main").unwrap();
/// assert_eq!(reference.owner, "vercel");
/// assert_eq!(reference.repo, "commerce");
/// ```
pub fn parse_github_url(input: &str) -> Result<RepositoryReference, Error> {
    let parsed = Url::parse(input.trim())
        .map_err(|e| Error::InvalidReference(format!("'{}' is not a URL ({})", input, e)))?;

    if parsed.host_str() != Some(GITHUB_HOST) {
        return Err(Error::InvalidReference(format!(
            "'{}' is not a {} URL",
            input, GITHUB_HOST
        )));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, repo, ..] => Ok(RepositoryReference::new(*owner, *repo)),
        _ => Err(Error::InvalidReference(format!(
            "'{}' does not contain an owner and repository",
            input
        ))),
    }
}
