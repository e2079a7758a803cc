use tracing_test::traced_test;

use super::*;
use crate::test_support::MockContentsClient;

fn reference() -> RepositoryReference {
    RepositoryReference::new("acme", "webapp")
}

#[tokio::test]
async fn test_dashboard_calls_stats_end_to_end() {
    let client = MockContentsClient::new()
        .with_file("app/dashboard/page.tsx", "fetch('/api/stats')")
        .with_file("app/api/stats/route.ts", "export async function GET(){}");

    let report = analyze_repository(Arc::new(client), &AnalyzerConfig::default(), &reference())
        .await
        .unwrap();

    let dashboard = report.structure.routes.get("dashboard").unwrap();
    assert_eq!(
        dashboard.api_calls,
        vec![ApiCall {
            method: HttpMethod::Get,
            url: "/api/stats".to_string(),
            source_route: "dashboard".to_string(),
        }]
    );
    assert_eq!(
        report.structure.apis.get("/api/stats"),
        Some(&ApiEndpoint::new("/api/stats", HttpMethod::Get))
    );

    assert_eq!(report.graph.nodes.len(), 2);
    let ids: Vec<&str> = report.graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["route-dashboard", "api-/api/stats"]);
    assert_eq!(report.graph.edges.len(), 1);
    assert_eq!(report.graph.edges[0].label, "GET");
    assert!(report.unmatched_calls.is_empty());
}

#[tokio::test]
async fn test_empty_structure_is_reported_as_empty_result() {
    let client = MockContentsClient::new()
        .with_file("app/layout.tsx", "")
        .with_file("app/page.tsx", "fetch('/api/stats')");

    let result =
        analyze_repository(Arc::new(client), &AnalyzerConfig::default(), &reference()).await;

    match result {
        Err(Error::EmptyResult(message)) => assert_eq!(message, NO_ROUTES_FOUND),
        other => panic!("expected empty result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scan_repository_allows_empty_structure() {
    let client = MockContentsClient::new().with_file("app/layout.tsx", "");

    let structure = scan_repository(Arc::new(client), &AnalyzerConfig::default(), &reference())
        .await
        .unwrap();

    assert!(structure.is_empty());
    assert_eq!(structure.files.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_near_miss_is_logged_and_reported() {
    let client = MockContentsClient::new()
        .with_file("app/prompts/page.tsx", "fetch('/api/prompts/')")
        .with_file("app/api/prompts/route.ts", "export async function GET(){}");

    let report = analyze_repository(Arc::new(client), &AnalyzerConfig::default(), &reference())
        .await
        .unwrap();

    assert!(report.graph.edges.is_empty());
    assert_eq!(report.unmatched_calls.len(), 1);
    assert_eq!(
        report.unmatched_calls[0].near_miss.as_deref(),
        Some("/api/prompts")
    );
    assert!(logs_contain("API call does not exactly match an endpoint"));
}

#[test]
fn test_example_repositories_are_valid_references() {
    for example in EXAMPLE_REPOSITORIES {
        let reference = parse_github_url(example.url).unwrap();
        assert_eq!(reference.owner, "vercel");
        assert!(!example.title.is_empty());
    }
}

#[test]
fn test_report_serializes_camel_case() {
    let report = AnalysisReport {
        reference: reference(),
        structure: RepoStructure::default(),
        graph: FlowGraph::default(),
        unmatched_calls: Vec::new(),
    };

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["reference"]["owner"], "acme");
    assert!(value["unmatchedCalls"].as_array().unwrap().is_empty());
}
