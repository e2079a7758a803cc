//! Interactive analysis session: state machine, token store and client
//! construction for front ends.
//!
//! A front end owns one [`VisualizerShell`] and calls [`VisualizerShell::analyze`]
//! for each URL the user submits. Only the most recent run may commit its
//! result; a run that finishes after a newer one started is discarded.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use github_client::{
    create_client, resolve_token, GitHubClient, RepositoryContentsClient, DEFAULT_REQUEST_TIMEOUT,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::config::AnalyzerConfig;
use crate::reference::{parse_github_url, RepositoryReference};
use crate::{analyze_repository, AnalysisReport, Error};

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;

/// Builds a contents client for one analysis run.
pub trait ContentsClientFactory: Send + Sync {
    fn create(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Arc<dyn RepositoryContentsClient>, Error>;
}

/// Creates [`GitHubClient`]s against the public API or an alternative base URL.
#[derive(Debug, Clone)]
pub struct GitHubClientFactory {
    api_base_url: Option<String>,
    request_timeout: Duration,
}

impl Default for GitHubClientFactory {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GitHubClientFactory {
    pub fn new(api_base_url: Option<String>, request_timeout: Duration) -> Self {
        Self {
            api_base_url,
            request_timeout,
        }
    }
}

impl ContentsClientFactory for GitHubClientFactory {
    fn create(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Arc<dyn RepositoryContentsClient>, Error> {
        let octocrab = create_client(self.api_base_url.as_deref(), token)?;
        Ok(Arc::new(
            GitHubClient::new(octocrab).with_request_timeout(self.request_timeout),
        ))
    }
}

/// Access token held for the lifetime of the session only.
#[derive(Default)]
pub struct SessionTokenStore {
    token: Option<SecretString>,
}

impl SessionTokenStore {
    /// Stores a token. Blank input clears the store.
    pub fn set(&mut self, token: &str) {
        let token = token.trim();
        self.token = if token.is_empty() {
            None
        } else {
            Some(SecretString::from(token.to_string()))
        };
    }

    pub fn remove(&mut self) {
        self.token = None;
    }

    pub fn has(&self) -> bool {
        self.token.is_some()
    }

    pub fn get(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

/// How a failed analysis should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The URL could not be parsed. Nothing was requested.
    InvalidInput,

    /// The provider refused for quota reasons. Offer token entry and retry.
    TokenRequired,

    /// Nothing to show: missing repository or no routes found.
    EmptyState,

    /// Any other failure, shown verbatim.
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ShellFailure {
    pub fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::InvalidReference(_) => FailureKind::InvalidInput,
            Error::RateLimited => FailureKind::TokenRequired,
            Error::NotFound | Error::EmptyResult(_) => FailureKind::EmptyState,
            _ => FailureKind::Message,
        };

        Self {
            kind,
            message: error.to_string(),
        }
    }

    pub fn offers_token_entry(&self) -> bool {
        self.kind == FailureKind::TokenRequired
    }
}

#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing {
        reference: RepositoryReference,
    },
    Success(Box<AnalysisReport>),
    Failed(ShellFailure),
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, AnalysisState::Analyzing { .. })
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisState::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ShellFailure> {
        match self {
            AnalysisState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ShellInner {
    state: AnalysisState,
    run_id: u64,
    tokens: SessionTokenStore,
}

/// Drives analyses for an interactive front end.
pub struct VisualizerShell {
    factory: Arc<dyn ContentsClientFactory>,
    config: AnalyzerConfig,
    explicit_token: Option<SecretString>,
    inner: Mutex<ShellInner>,
}

impl VisualizerShell {
    pub fn new(factory: Arc<dyn ContentsClientFactory>, config: AnalyzerConfig) -> Self {
        Self {
            factory,
            config,
            explicit_token: None,
            inner: Mutex::new(ShellInner::default()),
        }
    }

    /// Uses `token` ahead of the environment and the session store.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.explicit_token = Some(token);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn state(&self) -> AnalysisState {
        self.lock().state.clone()
    }

    pub fn set_token(&self, token: &str) {
        self.lock().tokens.set(token);
    }

    pub fn remove_token(&self) {
        self.lock().tokens.remove();
    }

    pub fn has_token(&self) -> bool {
        self.lock().tokens.has()
    }

    /// Returns to `Idle` and invalidates any run still in flight.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.run_id += 1;
        inner.state = AnalysisState::Idle;
    }

    /// Analyzes the repository at `url` and returns the resulting state.
    ///
    /// The previous result is cleared as soon as the run starts. If another
    /// run starts (or `reset` is called) before this one finishes, this
    /// run's outcome is dropped and the newer state is returned instead.
    #[instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> AnalysisState {
        let reference = match parse_github_url(url) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(error = %e, "Rejected repository URL");
                let mut inner = self.lock();
                inner.run_id += 1;
                inner.state = AnalysisState::Failed(ShellFailure::from_error(&e));
                return inner.state.clone();
            }
        };

        let (run_id, session_token) = {
            let mut inner = self.lock();
            inner.run_id += 1;
            inner.state = AnalysisState::Analyzing {
                reference: reference.clone(),
            };
            let session_token = inner
                .tokens
                .get()
                .map(|token| token.expose_secret().to_string());
            (inner.run_id, session_token)
        };

        info!(run_id, repository = %reference, "Starting analysis");
        let outcome = self.run(&reference, session_token.as_deref()).await;

        let mut inner = self.lock();
        if inner.run_id != run_id {
            debug!(run_id, current = inner.run_id, "Discarding stale analysis result");
            return inner.state.clone();
        }

        inner.state = match outcome {
            Ok(report) => {
                info!(
                    run_id,
                    nodes = report.graph.nodes.len(),
                    edges = report.graph.edges.len(),
                    "Analysis succeeded"
                );
                AnalysisState::Success(Box::new(report))
            }
            Err(e) => {
                warn!(run_id, error = %e, "Analysis failed");
                AnalysisState::Failed(ShellFailure::from_error(&e))
            }
        };
        inner.state.clone()
    }

    async fn run(
        &self,
        reference: &RepositoryReference,
        session_token: Option<&str>,
    ) -> Result<AnalysisReport, Error> {
        let explicit = self
            .explicit_token
            .as_ref()
            .map(|token| token.expose_secret());
        let token = resolve_token(explicit, session_token);

        let client = self.factory.create(token.as_ref())?;
        analyze_repository(client, &self.config, reference).await
    }

    fn lock(&self) -> MutexGuard<'_, ShellInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
