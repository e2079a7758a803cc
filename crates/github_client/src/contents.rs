//! Repository contents domain types.
//!
//! This module contains types for working with GitHub repository contents,
//! including directory listings and single-file payloads.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// A single entry in a GitHub repository directory listing.
///
/// Represents files, directories, symlinks, and submodules returned by
/// the GitHub Contents API. Only `name`, `path` and `type` are required on
/// the wire; the remaining fields fall back to their defaults when absent.
///
/// # Examples
///
/// ```rust
/// use github_client::{TreeEntry, EntryType};
///
/// let entry = TreeEntry {
///     name: "dashboard".to_string(),
///     path: "app/dashboard".to_string(),
///     entry_type: EntryType::Dir,
///     sha: "abc123".to_string(),
///     size: 0,
///     download_url: None,
/// };
///
/// assert!(entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry name (e.g., "dashboard", "page.tsx")
    pub name: String,

    /// Full path within repository (e.g., "app/dashboard/page.tsx")
    pub path: String,

    /// Entry type (file, directory, symlink, submodule)
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Git SHA of the entry
    #[serde(default)]
    pub sha: String,

    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,

    /// Download URL for files (None for directories)
    #[serde(default)]
    pub download_url: Option<String>,
}

impl TreeEntry {
    /// Returns `true` when the entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.entry_type, EntryType::Dir)
    }

    /// Returns `true` when the entry is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self.entry_type, EntryType::File)
    }
}

/// Type of entry in a repository directory.
///
/// Maps to GitHub's content type field in the Contents API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file
    File,

    /// Directory (can contain other entries)
    Dir,

    /// Symbolic link
    Symlink,

    /// Git submodule reference
    Submodule,
}

/// The single-file representation returned by the Contents API.
///
/// Directory listings are arrays of [`TreeEntry`]; asking for a file path
/// returns one object whose `content` is base64 encoded and wrapped at 60
/// columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileContentPayload {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub path: String,

    /// Encoded file body. Absent for very large files and for non-file types.
    #[serde(default)]
    pub content: Option<String>,

    /// Encoding of `content`; GitHub reports `"base64"`.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl FileContentPayload {
    /// Decodes the payload into text.
    ///
    /// A payload without a `content` field decodes to an empty string. Line
    /// breaks inside the base64 body are ignored and bytes that are not valid
    /// UTF-8 are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` when the body is not valid base64.
    pub fn decode_text(&self) -> Result<String, Error> {
        let Some(encoded) = self.content.as_deref() else {
            return Ok(String::new());
        };

        match self.encoding.as_deref() {
            None | Some("base64") => {
                let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = STANDARD
                    .decode(compact.as_bytes())
                    .map_err(|_| Error::InvalidResponse)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Some(_) => Ok(encoded.to_string()),
        }
    }
}
