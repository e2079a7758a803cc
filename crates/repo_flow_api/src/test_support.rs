//! Stub GitHub access shared by the handler and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use github_client::{EntryType, RepositoryContentsClient, TreeEntry};
use repo_flow_core::{AnalyzerConfig, ContentsClientFactory};
use secrecy::{ExposeSecret, SecretString};

use crate::AppState;

/// Serves a fixed tree built from file paths, or fails every request.
#[derive(Default)]
pub(crate) struct StubClient {
    listings: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    failure: Option<fn() -> github_client::Error>,
}

impl StubClient {
    /// A dashboard page calling `/api/stats` twice, once with a trailing slash.
    pub(crate) fn dashboard() -> Self {
        Self::default()
            .with_file(
                "app/dashboard/page.tsx",
                "fetch('/api/stats'); fetch('/api/stats/')",
            )
            .with_file("app/api/stats/route.ts", "export async function GET() {}")
    }

    pub(crate) fn failing(error: fn() -> github_client::Error) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn with_file(mut self, path: &str, content: &str) -> Self {
        let mut child = path.to_string();
        let mut entry_type = EntryType::File;
        while let Some((parent, name)) = child.rsplit_once('/') {
            let listing = self.listings.entry(parent.to_string()).or_default();
            if !listing.iter().any(|entry| entry.path == child) {
                listing.push(TreeEntry {
                    name: name.to_string(),
                    path: child.clone(),
                    entry_type,
                    sha: String::new(),
                    size: 0,
                    download_url: None,
                });
            }
            child = parent.to_string();
            entry_type = EntryType::Dir;
        }
        self.files.insert(path.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl RepositoryContentsClient for StubClient {
    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>, github_client::Error> {
        if let Some(error) = self.failure {
            return Err(error());
        }
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
        if let Some(error) = self.failure {
            return Err(error());
        }
        self.files
            .get(path)
            .cloned()
            .ok_or(github_client::Error::NotFound)
    }
}

/// Hands out one shared client and records the token of every request.
pub(crate) struct StubFactory {
    client: Arc<StubClient>,
    tokens: Mutex<Vec<Option<String>>>,
}

impl StubFactory {
    pub(crate) fn new(client: StubClient) -> Self {
        Self {
            client: Arc::new(client),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn tokens(&self) -> Vec<Option<String>> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ContentsClientFactory for StubFactory {
    fn create(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Arc<dyn RepositoryContentsClient>, repo_flow_core::Error> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(token.map(|t| t.expose_secret().to_string()));
        Ok(self.client.clone())
    }
}

pub(crate) fn state_with(client: StubClient) -> (AppState, Arc<StubFactory>) {
    let factory = Arc::new(StubFactory::new(client));
    let state = AppState::new(factory.clone(), AnalyzerConfig::default());
    (state, factory)
}
