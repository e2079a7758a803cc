use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Exit code for a completed run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the analysis itself failed.
pub const EXIT_ANALYSIS_FAILURE: i32 = 1;

/// Exit code for bad arguments or configuration.
pub const EXIT_USAGE_ERROR: i32 = 2;

/// Errors that can occur in the Repo Flow CLI application.
///
/// Each variant maps to one process exit code through [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    /// The analysis ran and failed: rate limit, missing repository, empty
    /// result or a provider error.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when there are issues with the configuration file,
    /// such as invalid values or file access problems.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided, including a URL that
    /// does not name a GitHub repository.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file.")]
    LoadFile(io::Error),

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse TOML configuration file.")]
    ParseTomlFile(toml::de::Error),

    /// The report could not be serialized for output.
    #[error("Failed to serialize output: {0}")]
    Serialization(String),

    /// Failed to read a line from standard input.
    #[error("Failed to read from std in.")]
    StdInReadFailed,

    /// Failed to flush the standard output buffer.
    ///
    /// This error occurs when the CLI cannot write output to the terminal,
    /// typically due to broken pipes or terminal issues.
    #[error("Failed to flush the std out buffer.")]
    StdOutFlushFailed,
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::InvalidArguments(_)
            | Error::LoadFile(_)
            | Error::ParseTomlFile(_) => EXIT_USAGE_ERROR,
            _ => EXIT_ANALYSIS_FAILURE,
        }
    }
}
