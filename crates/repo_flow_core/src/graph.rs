//! Projection of a repository structure into a positioned flow graph.
//!
//! Routes form the left column and endpoints the right column, each in
//! discovery order. Edges link a route to an endpoint only when a recorded
//! call's URL is exactly the endpoint path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::{ApiCall, ApiEndpoint, PathMap, RouteNode};

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;

/// Column and row geometry for [`GraphBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLayout {
    pub route_column_x: f64,
    pub api_column_x: f64,
    pub row_height: f64,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            route_column_x: 100.0,
            api_column_x: 500.0,
            row_height: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Route,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,

    /// `/dashboard` for routes, `/api/stats` for endpoints.
    pub label: String,

    /// `Route` or `<METHOD> Endpoint`.
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    #[serde(rename = "source")]
    pub source_node_id: String,
    #[serde(rename = "target")]
    pub target_node_id: String,
    pub label: String,
    pub animated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A call that produced no edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedCall {
    pub call: ApiCall,

    /// Endpoint path the call was probably meant for.
    pub near_miss: Option<String>,
}

/// Builds graphs with a fixed layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    layout: GraphLayout,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: GraphLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    #[instrument(skip_all, fields(routes = routes.len(), apis = apis.len()))]
    pub fn build(&self, routes: &PathMap<RouteNode>, apis: &PathMap<ApiEndpoint>) -> FlowGraph {
        let mut nodes = Vec::with_capacity(routes.len() + apis.len());

        for (row, route_path) in routes.keys().enumerate() {
            nodes.push(GraphNode {
                id: route_node_id(route_path),
                kind: NodeKind::Route,
                position: Position {
                    x: self.layout.route_column_x,
                    y: row as f64 * self.layout.row_height,
                },
                label: format!("/{}", route_path),
                subtitle: "Route".to_string(),
            });
        }

        for (row, (api_path, endpoint)) in apis.iter().enumerate() {
            nodes.push(GraphNode {
                id: api_node_id(api_path),
                kind: NodeKind::Api,
                position: Position {
                    x: self.layout.api_column_x,
                    y: row as f64 * self.layout.row_height,
                },
                label: api_path.to_string(),
                subtitle: format!("{} Endpoint", endpoint.method),
            });
        }

        // First API node wins when two share a label.
        let mut targets: HashMap<&str, &str> = HashMap::new();
        for node in nodes.iter().filter(|node| node.kind == NodeKind::Api) {
            targets.entry(node.label.as_str()).or_insert(node.id.as_str());
        }

        let mut edges = Vec::new();
        for (route_path, route) in routes.iter() {
            for call in &route.api_calls {
                let Some(target) = targets.get(call.url.as_str()) else {
                    debug!(route = %route_path, url = %call.url, "No endpoint for call");
                    continue;
                };

                edges.push(GraphEdge {
                    id: format!("edge-{}-{}", route_path, call.url),
                    source_node_id: route_node_id(route_path),
                    target_node_id: (*target).to_string(),
                    label: call.method.to_string(),
                    animated: true,
                });
            }
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "Graph built");
        FlowGraph { nodes, edges }
    }
}

/// Builds a graph with the default layout.
pub fn build_graph(routes: &PathMap<RouteNode>, apis: &PathMap<ApiEndpoint>) -> FlowGraph {
    GraphBuilder::new().build(routes, apis)
}

/// Lists every recorded call that [`build_graph`] drops, with a suggested
/// endpoint when one is a near miss.
///
/// A near miss is an endpoint equal to the call URL once the query string and
/// trailing slash are removed, or an endpoint whose dynamic segments
/// (`[id]`, `[...slug]`) accept the URL.
pub fn find_unmatched_calls(
    routes: &PathMap<RouteNode>,
    apis: &PathMap<ApiEndpoint>,
) -> Vec<UnmatchedCall> {
    routes
        .values()
        .flat_map(|route| route.api_calls.iter())
        .filter(|call| !apis.contains_key(&call.url))
        .map(|call| UnmatchedCall {
            call: call.clone(),
            near_miss: near_miss(&call.url, apis),
        })
        .collect()
}

pub fn route_node_id(route_path: &str) -> String {
    format!("route-{}", route_path)
}

pub fn api_node_id(api_path: &str) -> String {
    format!("api-{}", api_path)
}

fn near_miss(url: &str, apis: &PathMap<ApiEndpoint>) -> Option<String> {
    let normalized = normalize_url(url);
    if apis.contains_key(normalized) {
        return Some(normalized.to_string());
    }

    apis.keys()
        .find(|pattern| matches_dynamic(pattern, normalized))
        .map(str::to_string)
}

fn normalize_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

fn matches_dynamic(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');

    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(segment), Some(_)) if is_catch_all(segment) => return true,
            (Some(segment), Some(value)) => {
                if !(is_dynamic(segment) || segment == value) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn is_dynamic(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']')
}

fn is_catch_all(segment: &str) -> bool {
    (is_dynamic(segment) && segment[1..].starts_with("..."))
        || (segment.starts_with("[[...") && segment.ends_with("]]"))
}
