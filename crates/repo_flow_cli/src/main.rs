use std::io;
use std::io::Write;

use clap::{Parser, Subcommand};

mod commands;
mod config;

mod errors;
use commands::analyze_cmd::AnalyzeArgs;
use commands::config_cmd::ConfigCommands;
use errors::{Error, EXIT_SUCCESS};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Repo Flow CLI: Visualize which pages of a Next.js App Router project call which API endpoints
#[derive(Parser)]
#[command(name = "repo-flow")]
#[command(about = "Map the routes and API calls of a GitHub repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a GitHub repository and print its flow graph
    Analyze(AnalyzeArgs),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// List example repositories
    Examples,

    /// Show the CLI version
    Version,
}

fn ask_user_for_value(request: &str) -> Result<String, Error> {
    print!("{}", request);

    io::stdout().flush().map_err(|_| Error::StdOutFlushFailed)?;

    let mut temp = String::new();
    io::stdin()
        .read_line(&mut temp)
        .map_err(|_| Error::StdInReadFailed)?;
    Ok(temp.trim().to_string())
}

fn exit_with(error: Error) -> ! {
    error!("Error: {error}");
    eprintln!("Error: {error}");
    std::process::exit(error.exit_code());
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(io::stderr))
        .with(EnvFilter::from_env("REPO_FLOW_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Analyze(args) => {
            match commands::analyze_cmd::execute(args, ask_user_for_value).await {
                Ok(output) => {
                    println!("{}", output);
                    std::process::exit(EXIT_SUCCESS);
                }
                Err(e) => exit_with(e),
            }
        }
        Commands::Config(cmd) => {
            if let Err(e) = commands::config_cmd::execute(cmd).await {
                exit_with(e);
            }
        }
        Commands::Examples => {
            println!("{}", commands::examples_cmd::render_examples());
        }
        Commands::Version => {
            // Print version info from baked-in value
            println!(
                "repo-flow version {}",
                option_env!("REPO_FLOW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
        }
    }
}
