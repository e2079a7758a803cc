//! Command modules for the Repo Flow CLI.
//!
//! - `analyze_cmd`: Analyze a repository and print its flow graph
//! - `config_cmd`: Configuration management commands
//! - `examples_cmd`: List sample repositories to try

pub mod analyze_cmd;
pub mod config_cmd;
pub mod examples_cmd;
