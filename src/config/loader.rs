//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, Environment, PasswordStorage, PortalConfig};
use super::secret::secret_string;
use crate::domain::errors::PortalError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PortalConfig
/// 4. Applies environment variable overrides (MEDIWISE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use mediwise::config::loader::load_config;
///
/// let config = load_config("mediwise.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PortalConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PortalError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PortalError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`] but from an in-memory TOML document
pub fn load_config_str(contents: &str) -> Result<PortalConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PortalConfig = toml::from_str(&contents)
        .map_err(|e| PortalError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PortalError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PortalError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        PortalError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Applies environment variable overrides using MEDIWISE_* prefix
///
/// Environment variables follow the pattern: MEDIWISE_<SECTION>_<KEY>
/// For example: MEDIWISE_SERVER_BIND_ADDRESS, MEDIWISE_SESSION_SECURE_COOKIE
///
/// # Errors
///
/// Returns an error when an override cannot be parsed into the field's type
fn apply_env_overrides(config: &mut PortalConfig) -> Result<()> {
    if let Some(val) = env_override("MEDIWISE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env_override("MEDIWISE_ENVIRONMENT") {
        config.environment = match val.as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(PortalError::Configuration(format!(
                    "Invalid value '{other}' for MEDIWISE_ENVIRONMENT"
                )))
            }
        };
    }

    if let Some(val) = env_override("MEDIWISE_DATABASE_TARGET") {
        config.database_target = match val.as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(PortalError::Configuration(format!(
                    "Invalid value '{other}' for MEDIWISE_DATABASE_TARGET"
                )))
            }
        };
    }

    // Server overrides
    if let Some(val) = env_override("MEDIWISE_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg) = config.postgresql {
        if let Some(val) = env_override("MEDIWISE_POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = secret_string(val);
        }
        if let Some(val) = env_override("MEDIWISE_POSTGRESQL_MAX_CONNECTIONS") {
            pg.max_connections = parse_override("MEDIWISE_POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
        if let Some(val) = env_override("MEDIWISE_POSTGRESQL_SSL_MODE") {
            pg.ssl_mode = val;
        }
    }

    // Session overrides
    if let Some(val) = env_override("MEDIWISE_SESSION_COOKIE_NAME") {
        config.session.cookie_name = val;
    }
    if let Some(val) = env_override("MEDIWISE_SESSION_MAX_AGE_SECONDS") {
        config.session.max_age_seconds = parse_override("MEDIWISE_SESSION_MAX_AGE_SECONDS", &val)?;
    }
    if let Some(val) = env_override("MEDIWISE_SESSION_SECURE_COOKIE") {
        config.session.secure_cookie = parse_override("MEDIWISE_SESSION_SECURE_COOKIE", &val)?;
    }

    // Security overrides
    if let Some(val) = env_override("MEDIWISE_SECURITY_PASSWORD_STORAGE") {
        config.security.password_storage = match val.as_str() {
            "pbkdf2" => PasswordStorage::Pbkdf2,
            "plaintext" => PasswordStorage::Plaintext,
            other => {
                return Err(PortalError::Configuration(format!(
                    "Invalid value '{other}' for MEDIWISE_SECURITY_PASSWORD_STORAGE"
                )))
            }
        };
    }
    if let Some(val) = env_override("MEDIWISE_SECURITY_PBKDF2_ITERATIONS") {
        config.security.pbkdf2_iterations =
            parse_override("MEDIWISE_SECURITY_PBKDF2_ITERATIONS", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_override("MEDIWISE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("MEDIWISE_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("MEDIWISE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("MEDIWISE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("MEDIWISE_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${MEDIWISE_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result.trim_end(), "password = \"test_value\"");
        std::env::remove_var("MEDIWISE_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("MEDIWISE_LOADER_MISSING_VAR");
        let input = "password = \"${MEDIWISE_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("MEDIWISE_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# connection_string = \"${MEDIWISE_LOADER_COMMENTED_OUT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${MEDIWISE_LOADER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-mediwise.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
database_target = "memory"

[application]
log_level = "debug"

[server]
bind_address = "0.0.0.0:9000"

[session]
cookie_name = "portal_sid"

[logging]
local_enabled = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.session.cookie_name, "portal_sid");
        assert_eq!(config.database_target, DatabaseTarget::Memory);
        assert_eq!(config.security.password_storage, PasswordStorage::Pbkdf2);
    }

    #[test]
    fn test_load_config_rejects_invalid_section() {
        let toml_content = r#"
database_target = "memory"

[security]
pbkdf2_iterations = 5
"#;
        let err = load_config_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("pbkdf2_iterations"));
    }
}
