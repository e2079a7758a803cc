//! Recursive traversal of a repository's routing root.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use github_client::{RepositoryContentsClient, TreeEntry};
use tracing::{debug, info, instrument, warn};

use crate::config::AnalyzerConfig;
use crate::model::{ApiEndpoint, FetchedFile, HttpMethod, RepoStructure, RouteNode};
use crate::reference::RepositoryReference;
use crate::scanner::detect_exported_method;
use crate::Error;

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;

type VisitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>;

/// Walks a repository through a [`RepositoryContentsClient`] and classifies
/// what it finds into routes and API endpoints.
///
/// Traversal is depth-first in the order the provider lists entries. Every
/// directory costs one listing call and every entry-point file one content
/// call; nothing is fetched concurrently.
pub struct RepositoryWalker {
    client: Arc<dyn RepositoryContentsClient>,
    config: AnalyzerConfig,
}

struct WalkState {
    owner: String,
    repo: String,
    structure: RepoStructure,
    requests: usize,
}

impl RepositoryWalker {
    pub fn new(client: Arc<dyn RepositoryContentsClient>, config: AnalyzerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Produces the full structure for one repository.
    ///
    /// # Errors
    ///
    /// Any client error aborts the walk immediately; no partial structure is
    /// returned. `Error::RequestBudgetExhausted` is returned when the
    /// configured request budget runs out.
    #[instrument(skip(self), fields(repository = %reference))]
    pub async fn walk(&self, reference: &RepositoryReference) -> Result<RepoStructure, Error> {
        let mut state = WalkState {
            owner: reference.owner.clone(),
            repo: reference.repo.clone(),
            structure: RepoStructure::default(),
            requests: 0,
        };

        let root = self.config.routing_root.clone();
        self.visit_directory(root, &mut state).await?;

        info!(
            routes = state.structure.routes.len(),
            apis = state.structure.apis.len(),
            files = state.structure.files.len(),
            requests = state.requests,
            "Repository walk complete"
        );

        Ok(state.structure)
    }

    fn visit_directory<'a>(&'a self, path: String, state: &'a mut WalkState) -> VisitFuture<'a> {
        Box::pin(async move {
            self.charge_request(state)?;
            let entries = self
                .client
                .list_directory(&state.owner, &state.repo, &path)
                .await?;

            debug!(path = %path, entries = entries.len(), "Listed directory");

            for entry in entries {
                if entry.is_dir() {
                    if self.config.is_ignored_directory(&entry.name) {
                        debug!(path = %entry.path, "Skipping ignored directory");
                        continue;
                    }
                    self.register_directory(&entry, state);
                    self.visit_directory(entry.path, state).await?;
                } else if entry.is_file() {
                    self.visit_file(entry, state).await?;
                } else {
                    debug!(path = %entry.path, kind = ?entry.entry_type, "Skipping non-file entry");
                }
            }

            Ok(())
        })
    }

    fn register_directory(&self, entry: &TreeEntry, state: &mut WalkState) {
        let Some(relative) = self.config.relative_to_root(&entry.path) else {
            warn!(path = %entry.path, "Directory listed outside the routing root");
            return;
        };

        if self.config.is_api_marker(relative) {
            debug!(path = %entry.path, "Entering API sub-tree");
        } else if self.config.is_api_path(relative) {
            let key = AnalyzerConfig::endpoint_key(relative);
            state
                .structure
                .apis
                .insert(key.clone(), ApiEndpoint::new(key, HttpMethod::Get));
        } else {
            state
                .structure
                .routes
                .insert(relative, RouteNode::new(relative));
        }
    }

    async fn visit_file(&self, entry: TreeEntry, state: &mut WalkState) -> Result<(), Error> {
        if self.config.entry_point_kind(&entry.name).is_none() {
            state.structure.files.push(FetchedFile {
                name: entry.name,
                path: entry.path,
                content: None,
            });
            return Ok(());
        }

        self.charge_request(state)?;
        let content = self
            .client
            .get_file_content(&state.owner, &state.repo, &entry.path)
            .await?;

        if let Some(directory) = self.config.entry_point_directory(&entry.path) {
            if self.config.is_api_path(directory) {
                let key = AnalyzerConfig::endpoint_key(directory);
                let method = detect_exported_method(&content).unwrap_or_default();
                debug!(endpoint = %key, method = %method, "Registered API endpoint");
                state
                    .structure
                    .apis
                    .insert(key.clone(), ApiEndpoint::new(key, method));
            }
        }

        state.structure.files.push(FetchedFile {
            name: entry.name,
            path: entry.path,
            content: Some(content),
        });
        Ok(())
    }

    fn charge_request(&self, state: &mut WalkState) -> Result<(), Error> {
        if let Some(budget) = self.config.max_requests {
            if state.requests >= budget {
                warn!(budget, "Request budget exhausted");
                return Err(Error::RequestBudgetExhausted(budget));
            }
        }
        state.requests += 1;
        Ok(())
    }
}
