//! Create-admin command implementation
//!
//! Admins cannot register through the portal; this command inserts one.

use crate::adapters::database::create_store;
use crate::config::load_config;
use crate::core::admin::AdminAccounts;
use crate::core::auth::PasswordHasher;
use crate::domain::PortalError;
use clap::Args;

/// Arguments for the create-admin command
#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    /// Admin email address
    #[arg(long)]
    pub email: String,

    /// Admin password (at least 8 characters)
    #[arg(long, env = "MEDIWISE_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl CreateAdminArgs {
    /// Execute the create-admin command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let store = match create_store(&config).await {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Failed to connect to the database: {e}");
                return Ok(4);
            }
        };
        if let Err(e) = store.ensure_schema().await {
            eprintln!("Failed to initialize the database schema: {e}");
            return Ok(4);
        }

        let accounts = AdminAccounts::new(store, PasswordHasher::from_config(&config.security));
        match accounts.create(&self.email, &self.password).await {
            Ok(admin) => {
                println!("Admin created: {} (id {})", admin.email, admin.id);
                Ok(0)
            }
            Err(PortalError::Validation(errors)) => {
                eprintln!("Admin not created:");
                for (field, messages) in errors.iter() {
                    for message in messages {
                        eprintln!("  {field}: {message}");
                    }
                }
                Ok(2)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create admin");
                eprintln!("Failed to create admin: {e}");
                Ok(5)
            }
        }
    }
}
