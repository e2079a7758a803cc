//! In-memory contents client shared by the crate's unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use github_client::{EntryType, RepositoryContentsClient, TreeEntry};

/// Serves a synthetic repository tree built from file paths.
#[derive(Default)]
pub(crate) struct MockContentsClient {
    listings: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    failures: HashMap<String, fn() -> github_client::Error>,
    requests: Mutex<Vec<String>>,
}

impl MockContentsClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a file and every directory above it.
    pub(crate) fn with_file(mut self, path: &str, content: &str) -> Self {
        self.add_entry(path, EntryType::File);
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Adds a directory, which lists as empty unless files are added below it.
    pub(crate) fn with_dir(mut self, path: &str) -> Self {
        self.add_entry(path, EntryType::Dir);
        self
    }

    /// Makes every request for `path` fail with the given error.
    pub(crate) fn failing_at(mut self, path: &str, error: fn() -> github_client::Error) -> Self {
        self.failures.insert(path.to_string(), error);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn add_entry(&mut self, path: &str, entry_type: EntryType) {
        if entry_type == EntryType::Dir {
            self.listings.entry(path.to_string()).or_default();
        }

        let Some((parent, name)) = path.rsplit_once('/') else {
            return;
        };

        if !self.listings.contains_key(parent) {
            self.add_entry(parent, EntryType::Dir);
        }

        let listing = self.listings.entry(parent.to_string()).or_default();
        if !listing.iter().any(|entry| entry.path == path) {
            listing.push(TreeEntry {
                name: name.to_string(),
                path: path.to_string(),
                entry_type,
                sha: String::new(),
                size: 0,
                download_url: None,
            });
        }
    }

    fn record(&self, path: &str) -> Result<(), github_client::Error> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_string());

        match self.failures.get(path) {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepositoryContentsClient for MockContentsClient {
    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>, github_client::Error> {
        self.record(path)?;
        self.listings
            .get(path)
            .cloned()
            .ok_or(github_client::Error::NotFound)
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<String, github_client::Error> {
        self.record(path)?;
        self.files
            .get(path)
            .cloned()
            .ok_or(github_client::Error::NotFound)
    }
}
