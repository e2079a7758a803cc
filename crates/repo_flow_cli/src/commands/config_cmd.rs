use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax and values
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show current configuration
    Show {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to show (e.g., "analyzer.routing_root")
        key: Option<String>,
    },

    /// Update configuration values
    Set {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to set (e.g., "github.request_timeout_seconds")
        key: String,

        /// Value to set. An empty value clears optional keys.
        value: String,
    },
}

/// Execute the config command
#[instrument]
pub async fn execute(cmd: &ConfigCommands) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
        ConfigCommands::Show { path, key } => show_config(path.as_deref(), key.as_deref()),
        ConfigCommands::Set { path, key, value } => set_config(path.as_deref(), key, value),
    }
}

/// Initialize a new configuration file
#[instrument]
fn init_config(path: Option<&str>) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(&config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file
#[instrument]
fn validate_config(path: Option<&str>) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(message = "Validating configuration", path = ?config_path);

    let result = AppConfig::load(&config_path).and_then(|config| config.validate());
    match result {
        Ok(()) => {
            info!(message = "Configuration is valid", path = ?config_path);
            println!("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            error!(
                message = "Configuration is invalid",
                path = ?config_path,
                error = ?e
            );
            Err(Error::Config(format!("The configuration is invalid: {}", e)))
        }
    }
}

/// Print the whole configuration or one value
#[instrument]
fn show_config(path: Option<&str>, key: Option<&str>) -> Result<(), Error> {
    let config = AppConfig::load_or_default(path)?;

    if let Some(key) = key {
        let value = get_config_value(&config, key)?;
        println!("{}: {}", key, value);
    } else {
        let config_str = toml::to_string_pretty(&config)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;
        println!("{}", config_str);
    }

    Ok(())
}

/// Set a configuration value
#[instrument]
fn set_config(path: Option<&str>, key: &str, value: &str) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(message = "Setting configuration", path = ?config_path, key = key);

    let mut config = if config_path.exists() {
        AppConfig::load(&config_path)?
    } else {
        AppConfig::default()
    };

    set_config_value(&mut config, key, value)?;
    config.validate()?;
    config.save(&config_path)?;

    info!(message = "Configuration updated", key = key, value = value);
    println!("Configuration updated: {} = {}", key, value);
    Ok(())
}

/// Get a value from the configuration by key path
pub(crate) fn get_config_value(config: &AppConfig, key: &str) -> Result<String, Error> {
    let analyzer = &config.analyzer;
    let github = &config.github;

    let value = match key {
        "analyzer.routing_root" => analyzer.routing_root.clone(),
        "analyzer.api_directory" => analyzer.api_directory.clone(),
        "analyzer.ignored_directories" => analyzer.ignored_directories.join(","),
        "analyzer.page_entry_stem" => analyzer.page_entry_stem.clone(),
        "analyzer.handler_entry_stem" => analyzer.handler_entry_stem.clone(),
        "analyzer.entry_extensions" => analyzer.entry_extensions.join(","),
        "analyzer.max_requests" => analyzer
            .max_requests
            .map(|n| n.to_string())
            .unwrap_or_default(),
        "github.api_base_url" => github.api_base_url.clone().unwrap_or_default(),
        "github.request_timeout_seconds" => github.request_timeout_seconds.to_string(),
        _ => {
            return Err(Error::InvalidArguments(format!(
                "Invalid configuration key: {}",
                key
            )))
        }
    };

    Ok(value)
}

/// Set a value in the configuration by key path
///
/// List keys take a comma-separated value.
pub(crate) fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), Error> {
    let analyzer = &mut config.analyzer;
    let github = &mut config.github;

    match key {
        "analyzer.routing_root" => analyzer.routing_root = value.to_string(),
        "analyzer.api_directory" => analyzer.api_directory = value.to_string(),
        "analyzer.ignored_directories" => analyzer.ignored_directories = split_list(value),
        "analyzer.page_entry_stem" => analyzer.page_entry_stem = value.to_string(),
        "analyzer.handler_entry_stem" => analyzer.handler_entry_stem = value.to_string(),
        "analyzer.entry_extensions" => analyzer.entry_extensions = split_list(value),
        "analyzer.max_requests" => {
            analyzer.max_requests = if value.is_empty() {
                None
            } else {
                Some(parse_number(key, value)? as usize)
            }
        }
        "github.api_base_url" => {
            github.api_base_url = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "github.request_timeout_seconds" => {
            github.request_timeout_seconds = parse_number(key, value)?
        }
        _ => {
            return Err(Error::InvalidArguments(format!(
                "Invalid configuration key: {}",
                key
            )))
        }
    }

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(key: &str, value: &str) -> Result<u64, Error> {
    value.parse::<u64>().map_err(|e| {
        Error::InvalidArguments(format!(
            "Expected a number for {}, got '{}': {}",
            key, value, e
        ))
    })
}
