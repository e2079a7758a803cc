use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use github_client::{EntryType, RepositoryContentsClient, TreeEntry, GITHUB_TOKEN_ENV_VAR};
use repo_flow_core::{AnalyzerConfig, ContentsClientFactory};
use secrecy::ExposeSecret;
use serial_test::serial;

use super::*;

fn entry(path: &str, entry_type: EntryType) -> TreeEntry {
    TreeEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        entry_type,
        sha: String::new(),
        size: 0,
        download_url: None,
    }
}

/// Serves a two-file App Router project, or rate limits every call.
struct FixtureClient {
    rate_limited: bool,
    listings: HashMap<&'static str, Vec<TreeEntry>>,
    files: HashMap<&'static str, &'static str>,
}

impl FixtureClient {
    fn new(rate_limited: bool) -> Self {
        let listings = HashMap::from([
            (
                "app",
                vec![
                    entry("app/dashboard", EntryType::Dir),
                    entry("app/prompts", EntryType::Dir),
                    entry("app/api", EntryType::Dir),
                ],
            ),
            (
                "app/dashboard",
                vec![entry("app/dashboard/page.tsx", EntryType::File)],
            ),
            (
                "app/prompts",
                vec![entry("app/prompts/page.tsx", EntryType::File)],
            ),
            ("app/api", vec![entry("app/api/stats", EntryType::Dir)]),
            (
                "app/api/stats",
                vec![entry("app/api/stats/route.ts", EntryType::File)],
            ),
        ]);
        let files = HashMap::from([
            ("app/dashboard/page.tsx", "fetch('/api/stats')"),
            ("app/prompts/page.tsx", "axios.post('/api/stats/')"),
            ("app/api/stats/route.ts", "export async function GET(){}"),
        ]);

        Self {
            rate_limited,
            listings,
            files,
        }
    }
}

#[async_trait]
impl RepositoryContentsClient for FixtureClient {
    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>, github_client::Error> {
        if self.rate_limited {
            return Err(github_client::Error::RateLimitExceeded);
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
        self.files
            .get(path)
            .map(|content| content.to_string())
            .ok_or(github_client::Error::NotFound)
    }
}

/// Rate limits every client created without the expected token.
struct TokenGatedFactory;

impl ContentsClientFactory for TokenGatedFactory {
    fn create(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Arc<dyn RepositoryContentsClient>, repo_flow_core::Error> {
        let authorized = token.map(|t| t.expose_secret() == "ghp_valid").unwrap_or(false);
        Ok(Arc::new(FixtureClient::new(!authorized)))
    }
}

fn shell() -> VisualizerShell {
    std::env::remove_var(GITHUB_TOKEN_ENV_VAR);
    VisualizerShell::new(Arc::new(TokenGatedFactory), AnalyzerConfig::default())
}

#[tokio::test]
#[serial]
async fn test_authorized_run_renders_text() {
    let shell = shell().with_token(SecretString::from("ghp_valid".to_string()));

    let output = handle_analyze_command(
        &shell,
        "https://github.com/acme/webapp",
        OutputFormat::Text,
        None,
    )
    .await
    .unwrap();

    assert!(output.contains("acme/webapp"));
    assert!(output.contains("/dashboard"));
    assert!(output.contains("/api/stats"));
    assert!(output.contains("GET Endpoint"));
    assert!(output.contains("(did you mean /api/stats?)"));
}

#[tokio::test]
#[serial]
async fn test_json_output_contains_graph() {
    let shell = shell().with_token(SecretString::from("ghp_valid".to_string()));

    let output = handle_analyze_command(
        &shell,
        "https://github.com/acme/webapp",
        OutputFormat::Json,
        None,
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["graph"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["graph"]["edges"][0]["source"], "route-dashboard");
    assert_eq!(value["unmatchedCalls"][0]["nearMiss"], "/api/stats");
}

#[tokio::test]
#[serial]
async fn test_rate_limit_without_prompt_fails() {
    let shell = shell();

    let result = handle_analyze_command(
        &shell,
        "https://github.com/acme/webapp",
        OutputFormat::Text,
        None,
    )
    .await;

    match result {
        Err(Error::Analysis(message)) => assert!(message.contains("rate limit")),
        other => panic!("Expected analysis error, got {:?}", other),
    }
}

#[tokio::test]
#[serial]
async fn test_rate_limit_prompts_and_retries_with_token() {
    let shell = shell();
    let prompts = RefCell::new(Vec::new());
    let ask = |request: &str| -> Result<String, Error> {
        prompts.borrow_mut().push(request.to_string());
        Ok("ghp_valid".to_string())
    };

    let output = handle_analyze_command(
        &shell,
        "https://github.com/acme/webapp",
        OutputFormat::Text,
        Some(&ask),
    )
    .await
    .unwrap();

    assert!(output.contains("/dashboard"));
    assert_eq!(prompts.borrow().len(), 1);
    assert!(shell.has_token());
}

#[tokio::test]
#[serial]
async fn test_blank_token_cancels_retry() {
    let shell = shell();
    let ask = |_: &str| -> Result<String, Error> { Ok(String::new()) };

    let result = handle_analyze_command(
        &shell,
        "https://github.com/acme/webapp",
        OutputFormat::Text,
        Some(&ask),
    )
    .await;

    assert!(matches!(result, Err(Error::Analysis(_))));
    assert!(!shell.has_token());
}

#[tokio::test]
#[serial]
async fn test_invalid_url_is_a_usage_error() {
    let shell = shell();

    let result = handle_analyze_command(
        &shell,
        "https://example.com/acme/webapp",
        OutputFormat::Text,
        None,
    )
    .await;

    let error = result.unwrap_err();
    assert!(matches!(error, Error::InvalidArguments(_)));
    assert_eq!(error.exit_code(), crate::errors::EXIT_USAGE_ERROR);
}
