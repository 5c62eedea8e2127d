//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the MediWise configuration file.

use crate::adapters::postgresql::redact_connection_string;
use crate::config::load_config;
use crate::config::schema::{DatabaseTarget, PortalConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(()) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

fn print_summary(config: &PortalConfig) {
    use secrecy::ExposeSecret;

    println!("Configuration Summary:");
    println!("  Environment: {:?}", config.environment);
    println!("  Log Level: {}", config.application.log_level);
    println!("  Bind Address: {}", config.server.bind_address);

    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            if let Some(ref pg_config) = config.postgresql {
                println!("  Database Target: PostgreSQL");
                println!(
                    "  PostgreSQL Connection: {}",
                    redact_connection_string(pg_config.connection_string.expose_secret().as_str())
                );
                println!("  Max Connections: {}", pg_config.max_connections);
                println!("  SSL Mode: {}", pg_config.ssl_mode);
            }
        }
        DatabaseTarget::Memory => {
            println!("  Database Target: in-memory (data is lost on restart)");
        }
    }

    println!("  Session Cookie: {}", config.session.cookie_name);
    println!("  Session Lifetime: {}s", config.session.max_age_seconds);
    println!("  Secure Cookie: {}", config.session.secure_cookie);
    println!(
        "  Password Storage: {:?} ({} iterations)",
        config.security.password_storage, config.security.pbkdf2_iterations
    );
    if config.logging.local_enabled {
        println!(
            "  File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        );
    } else {
        println!("  File Logging: disabled");
    }
    println!();
}
