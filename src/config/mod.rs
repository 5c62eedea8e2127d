//! Configuration management for MediWise.
//!
//! # Overview
//!
//! MediWise uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDIWISE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load, including production-only rules
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mediwise::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("mediwise.toml")?;
//! println!("Listening on {}", config.server.bind_address);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - HTTP bind address
//! - [`PostgreSQLConfig`] - Database connection and pool
//! - [`SessionConfig`] - Session cookie and lifetime
//! - [`SecurityConfig`] - Password storage
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//! database_target = "postgresql"
//!
//! [server]
//! bind_address = "0.0.0.0:8000"
//!
//! [postgresql]
//! connection_string = "${MEDIWISE_DATABASE_URL}"
//!
//! [session]
//! secure_cookie = true
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, DatabaseTarget, Environment, LoggingConfig, PasswordStorage, PortalConfig,
    PostgreSQLConfig, SecurityConfig, ServerConfig, SessionConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
