use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();

    assert_eq!(config.analyzer.routing_root, "app");
    assert_eq!(config.github.request_timeout_seconds, 30);
    assert!(config.github.api_base_url.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");

    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    assert!(matches!(result, Err(Error::ParseTomlFile(_))));
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_config.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_partial_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("partial.toml");
    fs::write(
        &config_path,
        "[analyzer]\nrouting_root = \"src/app\"\nmax_requests = 250\n",
    )
    .expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.analyzer.routing_root, "src/app");
    assert_eq!(config.analyzer.max_requests, Some(250));
    assert_eq!(config.analyzer.api_directory, "api");
    assert_eq!(config.github, GitHubConfig::default());
}

#[test]
fn test_app_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("test_config.toml");

    let mut original_config = AppConfig::default();
    original_config.analyzer.max_requests = Some(100);
    original_config.github.api_base_url = Some("https://github.example.com/api/v3/".to_string());
    original_config.github.request_timeout_seconds = 5;

    original_config
        .save(&config_path)
        .expect("Failed to save config");
    assert!(config_path.exists());

    let loaded_config = AppConfig::load(&config_path).expect("Failed to load config");
    assert_eq!(loaded_config, original_config);
    assert_eq!(loaded_config.github.request_timeout(), Duration::from_secs(5));
}

#[test]
fn test_app_config_save_creates_parent_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let nested_path = temp_dir
        .path()
        .join("nested")
        .join("directory")
        .join("repo-flow.toml");

    AppConfig::default()
        .save(&nested_path)
        .expect("Failed to save config with nested path");

    assert!(nested_path.exists());
    let loaded_config = AppConfig::load(&nested_path).expect("Failed to load config");
    assert_eq!(loaded_config, AppConfig::default());
}

#[test]
fn test_load_or_default_requires_named_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.toml");

    let result = AppConfig::load_or_default(missing.to_str());

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_or_default_validates_named_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("zero.toml");
    fs::write(&config_path, "[github]\nrequest_timeout_seconds = 0\n")
        .expect("Failed to write config");

    let result = AppConfig::load_or_default(config_path.to_str());

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("request_timeout_seconds")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_unusable_analyzer_settings() {
    let mut config = AppConfig::default();
    config.analyzer.api_directory = "app/api".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.analyzer.entry_extensions.clear();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.analyzer.routing_root = "/".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.analyzer.max_requests = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_get_config_path_with_none() {
    let result = get_config_path(None);
    let expected = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILENAME);
    assert_eq!(result, expected);
}

#[test]
fn test_get_config_path_with_provided_path() {
    let custom_path = "/custom/path/repo-flow.toml";
    let result = get_config_path(Some(custom_path));
    assert_eq!(result, PathBuf::from(custom_path));
}
