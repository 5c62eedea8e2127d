//! Serve command implementation
//!
//! This module implements the `serve` command: connect the store, apply the
//! schema, and run the portal until a shutdown signal arrives.

use crate::adapters::database::create_store;
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use crate::web::{self, AppState};
use clap::Args;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.bind_address
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Use the in-memory store instead of the configured database
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting portal");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(bind) = &self.bind {
            tracing::info!(bind = %bind, "Overriding bind address from CLI");
            config.server.bind_address = bind.clone();
        }
        if self.memory {
            tracing::info!("Using in-memory store from CLI");
            config.database_target = DatabaseTarget::Memory;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let store = match create_store(&config).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create store");
                eprintln!("Failed to connect to the database: {e}");
                return Ok(4);
            }
        };
        if let Err(e) = store.test_connection().await {
            tracing::error!(error = %e, backend = store.backend_name(), "Store connection test failed");
            eprintln!("Failed to connect to the database: {e}");
            return Ok(4);
        }
        if let Err(e) = store.ensure_schema().await {
            tracing::error!(error = %e, "Schema initialization failed");
            eprintln!("Failed to initialize the database schema: {e}");
            return Ok(4);
        }

        let state = AppState::new(&config, store)?;

        let addr = config
            .server
            .socket_addr()
            .map_err(anyhow::Error::msg)?;
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, address = %addr, "Failed to bind");
                eprintln!("Failed to bind {addr}: {e}");
                return Ok(5);
            }
        };

        println!("MediWise portal listening on http://{addr}");
        println!("Press Ctrl+C to stop.");

        match web::serve(listener, state, shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Portal stopped with an error");
                eprintln!("Server error: {e}");
                Ok(5)
            }
        }
    }
}
