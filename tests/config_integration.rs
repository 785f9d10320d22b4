use insight_hub::config::{AppConfig, DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE};
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("INSIGHT_API__BASE_URL");
        env::remove_var("INSIGHT_API__TOP_K");
        env::remove_var("INSIGHT_API__STRICT");
        env::remove_var("INSIGHT_LOGGING__LEVEL");
        env::remove_var("API_BASE_URL");
        env::remove_var("API_STRICT");
        env::remove_var("LOG_LEVEL");
        env::remove_var("LOG_JSON");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let (_, config) = AppConfig::load_from_args(["insight-hub", "health"]).expect("defaults load");
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.top_k, 5);
    assert!(!config.api.strict);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("INSIGHT_API__BASE_URL", "http://search.internal:9000");
        env::set_var("INSIGHT_API__TOP_K", "8");
        env::set_var("INSIGHT_API__STRICT", "true");
    }

    let (_, config) =
        AppConfig::load_from_args(["insight-hub", "status"]).expect("Failed to load config");
    assert_eq!(config.api.base_url, "http://search.internal:9000");
    assert_eq!(config.api.top_k, 8);
    assert!(config.api.strict);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("INSIGHT_API__BASE_URL", "http://from-env:9000");
    }

    let (_, config) = AppConfig::load_from_args([
        "insight-hub",
        "--base-url",
        "http://from-flag:7000",
        "health",
    ])
    .unwrap();
    assert_eq!(config.api.base_url, "http://from-flag:7000");

    // Flag-bound env var behaves like the flag
    unsafe {
        env::set_var("API_BASE_URL", "http://from-api-env:7100");
    }
    let (_, config) = AppConfig::load_from_args(["insight-hub", "health"]).unwrap();
    assert_eq!(config.api.base_url, "http://from-api-env:7100");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("custom.yaml");
    fs::write(
        &file_path,
        r#"
api:
  base_url: "http://files.example:8080"
  top_k: 3
logging:
  json: true
"#,
    )
    .expect("Failed to write temp config");

    let (_, config) = AppConfig::load_from_args([
        "insight-hub".to_string(),
        "--config".to_string(),
        file_path.display().to_string(),
        "health".to_string(),
    ])
    .expect("Failed to load config from file");
    assert_eq!(config.api.base_url, "http://files.example:8080");
    assert_eq!(config.api.top_k, 3);
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([
        "insight-hub",
        "--config",
        "/definitely/not/here.yaml",
        "health",
    ]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_zero_top_k_rejected() {
    clear_env_vars();
    unsafe {
        env::set_var("INSIGHT_API__TOP_K", "0");
    }

    let result = AppConfig::load_from_args(["insight-hub", "health"]);
    assert!(result.is_err());

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
api:
  base_url: "http://cwd.example:6060"
    "#;
    fs::write(DEFAULT_CONFIG_FILE, config_content).expect("Failed to write ./insight-hub.yaml");

    let result = AppConfig::load_from_args(["insight-hub", "health"]);

    fs::remove_file(DEFAULT_CONFIG_FILE).unwrap();

    let (_, config) = result.expect("Failed to load config");
    assert_eq!(config.api.base_url, "http://cwd.example:6060");
}
