//! Configuration management for the Repo Flow CLI.
//!
//! The configuration is stored in TOML format and can be loaded from a
//! specified file path or from the default location in the current directory.
//! Every section is optional, so an empty file yields the defaults.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use repo_flow_core::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "repo-flow.toml";

/// Default per-request timeout for GitHub API calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the Repo Flow CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// [analyzer]
/// routing_root = "src/app"
/// max_requests = 500
///
/// [github]
/// api_base_url = "https://github.example.com/api/v3/"
/// request_timeout_seconds = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Routing conventions and request budget.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// GitHub API connection settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The specified file does not exist
    /// - The file cannot be read due to permissions or I/O issues
    /// - The file contains invalid TOML or does not match the schema
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(Error::LoadFile)?;
        let config: AppConfig = toml::from_str(&content).map_err(Error::ParseTomlFile)?;

        Ok(config)
    }

    /// Loads the configuration for a command.
    ///
    /// An explicitly named file must exist. When no path is given the default
    /// file is used if present, otherwise the built-in defaults apply.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!(path = ?path, "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let config = Self::load(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the specified path.
    ///
    /// Parent directories are created and an existing file is overwritten.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Checks values that parse but cannot work.
    pub fn validate(&self) -> Result<(), Error> {
        let analyzer = &self.analyzer;

        if analyzer.routing_root.trim_matches('/').is_empty() {
            return Err(Error::Config(
                "analyzer.routing_root must not be empty".to_string(),
            ));
        }
        if analyzer.api_directory.is_empty() || analyzer.api_directory.contains('/') {
            return Err(Error::Config(
                "analyzer.api_directory must be a single directory name".to_string(),
            ));
        }
        if analyzer.entry_extensions.is_empty() {
            return Err(Error::Config(
                "analyzer.entry_extensions must list at least one extension".to_string(),
            ));
        }
        if analyzer.max_requests == Some(0) {
            return Err(Error::Config(
                "analyzer.max_requests must be greater than zero".to_string(),
            ));
        }
        if self.github.request_timeout_seconds == 0 {
            return Err(Error::Config(
                "github.request_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// GitHub API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Alternative API root, e.g. a GitHub Enterprise server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default = "GitHubConfig::default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl GitHubConfig {
    fn default_request_timeout_seconds() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_SECONDS
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_seconds: GitHubConfig::default_request_timeout_seconds(),
        }
    }
}

/// Resolves the path to the configuration file.
///
/// If `config_path` is `Some(path)` that path is used, otherwise
/// `./repo-flow.toml` in the current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
