//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so the
//! initialization test runs alone in this binary.

use mediwise::config::LoggingConfig;
use mediwise::domain::{PortalError, ProfileId, Role};
use mediwise::logging::init_logging;
use mediwise::logging::structured::LOG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/mediwise");
}

#[test]
fn test_console_only_config() {
    let config = LoggingConfig::console_only();
    assert!(!config.local_enabled);
    assert!(config.local_path.is_empty());
}

#[test]
fn test_file_logging_creates_directory_and_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
        local_max_size_mb: 100,
    };

    let guard = init_logging("debug", &config).expect("logging should initialize");
    assert!(guard.has_file_output());
    assert!(log_path.exists());

    // call-site events carry this test's target, which the default filter drops
    mediwise::log_login_attempt!("ann@example.com", Some((Role::Patient, ProfileId::new(3))));
    mediwise::log_profile_change!(Role::Doctor, ProfileId::new(7), "deleted");
    let error = PortalError::Configuration("Invalid config".to_string());
    mediwise::log_error_with_context!(&error, "Failed to load configuration");

    // dropping the guard flushes the non-blocking writer
    drop(guard);

    let contents: String = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(LOG_FILE_NAME)
        })
        .map(|entry| std::fs::read_to_string(entry.path()).unwrap())
        .collect();

    assert!(contents.contains("Logging initialized"));
    let first_line = contents.lines().next().unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(first_line).is_ok());
}

#[test]
fn test_invalid_level_is_rejected() {
    let result = init_logging("loud", &LoggingConfig::console_only());
    assert!(result.is_err());
}
