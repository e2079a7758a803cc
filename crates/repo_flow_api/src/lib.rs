//! Repo Flow REST API
//!
//! Exposes the repository analysis over HTTP so a web front end can render
//! the flow graph without talking to GitHub itself.
//!
//! # Architecture
//!
//! This crate is the HTTP layer and handles:
//! - request and response translation
//! - error mapping from analysis failures to HTTP status codes
//! - routing and server configuration
//!
//! The server authenticates to GitHub with a single token taken from the
//! environment. Callers never send a token.

use std::sync::Arc;

use repo_flow_core::{AnalyzerConfig, ContentsClientFactory};
use secrecy::SecretString;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{ApiError, ErrorResponse};
pub use models::{request, response};
pub use server::{ApiConfig, ApiServer};

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Creates one contents client per request.
    pub factory: Arc<dyn ContentsClientFactory>,

    /// Layout rules applied to every analyzed repository.
    pub analyzer: Arc<AnalyzerConfig>,

    /// Server-wide GitHub token, if configured.
    pub token: Option<Arc<SecretString>>,
}

impl AppState {
    pub fn new(factory: Arc<dyn ContentsClientFactory>, analyzer: AnalyzerConfig) -> Self {
        Self {
            factory,
            analyzer: Arc::new(analyzer),
            token: None,
        }
    }

    /// Authenticates every GitHub request made on behalf of API callers.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(Arc::new(token));
        self
    }
}
