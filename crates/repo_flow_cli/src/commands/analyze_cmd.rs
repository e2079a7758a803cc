//! Repository analysis command.
//!
//! Runs the analysis through a [`VisualizerShell`] and prints the flow graph
//! as text or JSON. When GitHub rate limits the run and prompting is allowed,
//! the user is asked for a personal access token and the analysis is retried
//! with it.
//!
//! ```bash
//! repo-flow analyze https://github.com/vercel/app-playground --format json
//! ```

use std::sync::Arc;

use clap::{Args, ValueEnum};
use colored::Colorize;
use repo_flow_core::{
    AnalysisReport, AnalysisState, FailureKind, GitHubClientFactory, NodeKind, VisualizerShell,
};
use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "analyze_cmd_tests.rs"]
mod tests;

const TOKEN_PROMPT: &str =
    "GitHub rate limit reached. Enter a personal access token (leave blank to cancel): ";

/// Output format for the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,

    /// The full report as pretty-printed JSON.
    Json,
}

/// Command-line arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// GitHub repository URL, e.g. https://github.com/vercel/app-playground
    pub url: String,

    /// Personal access token. Takes precedence over GITHUB_TOKEN.
    #[arg(long)]
    pub token: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Never prompt for a token; fail instead.
    #[arg(long)]
    pub no_prompt: bool,
}

/// Builds the shell from configuration and runs the analysis.
pub async fn execute<AskFn>(args: &AnalyzeArgs, ask_user_for_value: AskFn) -> Result<String, Error>
where
    AskFn: Fn(&str) -> Result<String, Error>,
{
    let config = AppConfig::load_or_default(args.config.as_deref())?;

    let factory = GitHubClientFactory::new(
        config.github.api_base_url.clone(),
        config.github.request_timeout(),
    );
    let mut shell = VisualizerShell::new(Arc::new(factory), config.analyzer.clone());
    if let Some(token) = args.token.as_deref().filter(|t| !t.trim().is_empty()) {
        shell = shell.with_token(SecretString::from(token.trim().to_string()));
    }

    let prompt = if args.no_prompt {
        None
    } else {
        Some(&ask_user_for_value as &dyn Fn(&str) -> Result<String, Error>)
    };

    handle_analyze_command(&shell, &args.url, args.format, prompt).await
}

/// Runs one analysis and renders the report.
///
/// A rate-limited run is retried for as long as `prompt` returns a token.
///
/// # Errors
///
/// * `Error::InvalidArguments` when the URL is not a GitHub repository.
/// * `Error::Analysis` for every other failure.
#[instrument(skip(shell, prompt), fields(interactive = prompt.is_some()))]
pub async fn handle_analyze_command(
    shell: &VisualizerShell,
    url: &str,
    format: OutputFormat,
    prompt: Option<&dyn Fn(&str) -> Result<String, Error>>,
) -> Result<String, Error> {
    let mut state = shell.analyze(url).await;

    loop {
        let failure = match state {
            AnalysisState::Success(report) => {
                info!(repository = %report.reference, "Rendering report");
                return render_report(&report, format);
            }
            AnalysisState::Failed(failure) => failure,
            other => {
                return Err(Error::Analysis(format!(
                    "Analysis did not complete: {:?}",
                    other
                )))
            }
        };

        match failure.kind {
            FailureKind::InvalidInput => return Err(Error::InvalidArguments(failure.message)),
            FailureKind::TokenRequired => {
                let Some(ask) = prompt else {
                    return Err(Error::Analysis(failure.message));
                };

                let token = ask(TOKEN_PROMPT)?;
                if token.trim().is_empty() {
                    debug!("Token entry cancelled");
                    return Err(Error::Analysis(failure.message));
                }

                warn!("Retrying analysis with a session token");
                shell.set_token(&token);
                state = shell.analyze(url).await;
            }
            FailureKind::EmptyState | FailureKind::Message => {
                return Err(Error::Analysis(failure.message))
            }
        }
    }
}

pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| Error::Serialization(e.to_string())),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &AnalysisReport) -> String {
    let mut output = String::new();
    let graph = &report.graph;

    output.push_str(&format!(
        "\n{} {}\n",
        "Repository:".bold(),
        report.reference.to_string().bright_cyan()
    ));

    let routes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Route)
        .collect();
    output.push_str(&format!("\n{} ({})\n", "Routes".bold(), routes.len()));
    if routes.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for node in routes {
        output.push_str(&format!("  {}\n", node.label));
    }

    let endpoints: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Api)
        .collect();
    output.push_str(&format!("\n{} ({})\n", "API endpoints".bold(), endpoints.len()));
    if endpoints.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for node in endpoints {
        output.push_str(&format!("  {}  {}\n", node.label, node.subtitle.dimmed()));
    }

    output.push_str(&format!("\n{} ({})\n", "Calls".bold(), graph.edges.len()));
    if graph.edges.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for edge in &graph.edges {
        let source = label_of(report, &edge.source_node_id);
        let target = label_of(report, &edge.target_node_id);
        output.push_str(&format!(
            "  {} {} {} {}\n",
            source,
            "→".green(),
            edge.label.green(),
            target
        ));
    }

    if !report.unmatched_calls.is_empty() {
        output.push_str(&format!("\n{}\n", "Unmatched calls".yellow().bold()));
        for unmatched in &report.unmatched_calls {
            let call = &unmatched.call;
            let hint = match &unmatched.near_miss {
                Some(endpoint) => format!(" (did you mean {}?)", endpoint),
                None => String::new(),
            };
            output.push_str(&format!(
                "  /{} {} {}{}\n",
                call.source_route, call.method, call.url, hint
            ));
        }
    }

    output
}

fn label_of<'a>(report: &'a AnalysisReport, node_id: &'a str) -> &'a str {
    report
        .graph
        .nodes
        .iter()
        .find(|node| node.id == node_id)
        .map(|node| node.label.as_str())
        .unwrap_or(node_id)
}
