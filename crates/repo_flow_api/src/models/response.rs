//! HTTP response type definitions
//!
//! Successful analysis responses wrap their payload in a `data` field.

use repo_flow_core::{AnalysisReport, FlowGraph, RepoStructure, UnmatchedCall};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Response for `POST /api/github`: the scanned repository structure.
#[derive(Debug, Clone, Serialize)]
pub struct StructureResponse {
    pub data: RepoStructure,
}

/// Response for `POST /api/graph`.
///
/// `warnings` lists the calls that produced no edge.
#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    pub data: FlowGraph,
    pub warnings: Vec<UnmatchedCall>,
}

impl From<AnalysisReport> for GraphResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            data: report.graph,
            warnings: report.unmatched_calls,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,

    /// Whether a server-side GitHub token is configured
    pub authenticated: bool,
}
