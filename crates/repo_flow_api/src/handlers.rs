//! HTTP request handlers
//!
//! Each handler:
//! 1. Extracts the request body
//! 2. Parses it into a repository reference
//! 3. Creates a contents client with the server token
//! 4. Runs the analysis and wraps the result in a response model

use std::sync::Arc;

use axum::{extract::State, Json};
use github_client::RepositoryContentsClient;
use repo_flow_core::{analyze_repository, scan_repository};
use tracing::{info, instrument};

use crate::{
    errors::ApiError,
    models::{AnalyzeRepositoryRequest, GraphResponse, HealthCheckResponse, StructureResponse},
    AppState,
};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

fn create_client(state: &AppState) -> Result<Arc<dyn RepositoryContentsClient>, ApiError> {
    Ok(state.factory.create(state.token.as_deref())?)
}

/// POST /api/github
///
/// Walks the repository and returns every fetched file, route and endpoint,
/// with call sites already attached to their routes. An empty structure is
/// a successful response.
#[instrument(skip(state, request), fields(repo_url = %request.repo_url))]
pub async fn fetch_structure(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRepositoryRequest>,
) -> Result<Json<StructureResponse>, ApiError> {
    let reference = request.repository_reference()?;
    let client = create_client(&state)?;

    let structure = scan_repository(client, &state.analyzer, &reference).await?;
    info!(
        files = structure.files.len(),
        routes = structure.routes.len(),
        apis = structure.apis.len(),
        "Repository structure fetched"
    );

    Ok(Json(StructureResponse { data: structure }))
}

/// POST /api/graph
///
/// Runs the full analysis and returns the flow graph. Calls that matched no
/// endpoint are listed under `warnings`.
#[instrument(skip(state, request), fields(repo_url = %request.repo_url))]
pub async fn build_flow_graph(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRepositoryRequest>,
) -> Result<Json<GraphResponse>, ApiError> {
    let reference = request.repository_reference()?;
    let client = create_client(&state)?;

    let report = analyze_repository(client, &state.analyzer, &reference).await?;

    Ok(Json(GraphResponse::from(report)))
}

/// GET /api/health
///
/// Returns service health status with version and timestamp.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        authenticated: state.token.is_some(),
    })
}
