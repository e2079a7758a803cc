//! # Repo Flow Core
//!
//! This crate turns a GitHub repository that follows the Next.js App Router
//! conventions into a flow graph of which pages call which API endpoints.
//!
//! ## Overview
//!
//! An analysis runs in four steps:
//! 1. Parse the repository URL into a [`RepositoryReference`]
//! 2. Walk the routing root through the GitHub contents API ([`RepositoryWalker`])
//! 3. Scan page sources for outbound API calls ([`CallSiteScanner`])
//! 4. Project routes, endpoints and calls into a positioned graph ([`build_graph`])
//!
//! [`analyze_repository`] runs the whole pipeline. Interactive front ends use
//! [`VisualizerShell`], which adds session state, token handling and stale-run
//! protection on top of it.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use github_client::{create_anonymous_client, GitHubClient};
//! use repo_flow_core::{analyze_repository, parse_github_url, AnalyzerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reference = parse_github_url("https://github.com/vercel/app-playground")?;
//! let client = Arc::new(GitHubClient::new(create_anonymous_client()?));
//!
//! let report = analyze_repository(client, &AnalyzerConfig::default(), &reference).await?;
//! println!(
//!     "{} nodes, {} edges",
//!     report.graph.nodes.len(),
//!     report.graph.edges.len()
//! );
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use github_client::RepositoryContentsClient;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

pub mod config;
pub mod errors;
pub mod graph;
pub mod model;
pub mod reference;
pub mod scanner;
pub mod shell;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

pub use config::{AnalyzerConfig, EntryPointKind};
pub use errors::Error;
pub use graph::{
    build_graph, find_unmatched_calls, FlowGraph, GraphBuilder, GraphEdge, GraphLayout, GraphNode,
    NodeKind, Position, UnmatchedCall,
};
pub use model::{ApiCall, ApiEndpoint, FetchedFile, HttpMethod, PathMap, RepoStructure, RouteNode};
pub use reference::{parse_github_url, RepositoryReference};
pub use scanner::{detect_exported_method, extract_call_sites, CallSite, CallSiteScanner};
pub use shell::{
    AnalysisState, ContentsClientFactory, FailureKind, GitHubClientFactory, SessionTokenStore,
    ShellFailure, VisualizerShell,
};
pub use walker::RepositoryWalker;

/// Reported when the walk finds neither routes nor endpoints.
pub const NO_ROUTES_FOUND: &str = "No App Router routes or API endpoints found in this repository";

/// Reported when a non-empty structure still projects to no nodes.
pub const NO_GRAPH_DATA: &str = "No visualization data could be generated from this repository";

/// A public repository offered as a starting point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleRepository {
    pub url: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Sample App Router repositories that analyze without a token.
pub const EXAMPLE_REPOSITORIES: [ExampleRepository; 3] = [
    ExampleRepository {
        url: "https://github.com/vercel/app-playground",
        title: "Next.js App Router Examples",
        description: "Official App Router examples from Vercel",
    },
    ExampleRepository {
        url: "https://github.com/vercel/commerce",
        title: "Next.js Commerce",
        description: "E-commerce site built with App Router and Server Components",
    },
    ExampleRepository {
        url: "https://github.com/vercel/next-learn",
        title: "Next.js Dashboard",
        description: "The dashboard app from Next.js learning course",
    },
];

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub reference: RepositoryReference,
    pub structure: RepoStructure,
    pub graph: FlowGraph,

    /// Calls that produced no edge, kept for diagnostics.
    pub unmatched_calls: Vec<UnmatchedCall>,
}

/// Walks the repository and records every route's API calls.
///
/// An empty structure is not an error here; callers decide how to present it.
///
/// # Errors
///
/// Propagates any walker error unchanged.
#[instrument(skip(client, config), fields(repository = %reference))]
pub async fn scan_repository(
    client: Arc<dyn RepositoryContentsClient>,
    config: &AnalyzerConfig,
    reference: &RepositoryReference,
) -> Result<RepoStructure, Error> {
    let walker = RepositoryWalker::new(client, config.clone());
    let mut structure = walker.walk(reference).await?;

    let calls = CallSiteScanner::new(config).scan(&structure.files, &mut structure.routes);
    debug!(calls, "Recorded API calls");

    Ok(structure)
}

/// Runs the full pipeline: walk, scan, graph.
///
/// Calls that match no endpoint are dropped from the graph. Each one is
/// logged, as a warning when an endpoint is a near miss, and returned in
/// [`AnalysisReport::unmatched_calls`].
///
/// # Errors
///
/// * Any walker error, unchanged.
/// * `Error::EmptyResult` when no routes or endpoints exist, or the graph has
///   no nodes.
#[instrument(skip(client, config), fields(repository = %reference))]
pub async fn analyze_repository(
    client: Arc<dyn RepositoryContentsClient>,
    config: &AnalyzerConfig,
    reference: &RepositoryReference,
) -> Result<AnalysisReport, Error> {
    let structure = scan_repository(client, config, reference).await?;
    if structure.is_empty() {
        return Err(Error::EmptyResult(NO_ROUTES_FOUND.to_string()));
    }

    let graph = build_graph(&structure.routes, &structure.apis);
    if graph.is_empty() {
        return Err(Error::EmptyResult(NO_GRAPH_DATA.to_string()));
    }

    let unmatched_calls = find_unmatched_calls(&structure.routes, &structure.apis);
    for unmatched in &unmatched_calls {
        match &unmatched.near_miss {
            Some(endpoint) => warn!(
                route = %unmatched.call.source_route,
                url = %unmatched.call.url,
                near_miss = %endpoint,
                "API call does not exactly match an endpoint"
            ),
            None => debug!(
                route = %unmatched.call.source_route,
                url = %unmatched.call.url,
                "API call has no matching endpoint"
            ),
        }
    }

    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        unmatched = unmatched_calls.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        reference: reference.clone(),
        structure,
        graph,
        unmatched_calls,
    })
}
