//! Repo Flow REST API Server
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `GITHUB_TOKEN`: Token used for every GitHub request (optional)
//! - `GITHUB_API_URL`: Alternative GitHub API base URL (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use github_client::{resolve_token, DEFAULT_REQUEST_TIMEOUT};
use repo_flow_api::{ApiConfig, ApiServer, AppState};
use repo_flow_core::{AnalyzerConfig, GitHubClientFactory};
use tracing_subscriber::EnvFilter;

const GITHUB_API_URL_ENV_VAR: &str = "GITHUB_API_URL";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ApiConfig::from_env()?;

    let api_base_url = env::var(GITHUB_API_URL_ENV_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty());
    let factory = GitHubClientFactory::new(api_base_url, DEFAULT_REQUEST_TIMEOUT);

    let mut state = AppState::new(Arc::new(factory), AnalyzerConfig::default());
    match resolve_token(None, None) {
        Some(token) => state = state.with_token(token),
        None => tracing::warn!("GITHUB_TOKEN is not set; GitHub requests are unauthenticated"),
    }

    tracing::info!(
        "Repo Flow API v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );

    ApiServer::new(config, state).serve().await
}
