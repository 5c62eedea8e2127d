//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for MediWise using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// MediWise - Hospital Portal
#[derive(Parser, Debug)]
#[command(name = "mediwise")]
#[command(version, about, long_about = None)]
#[command(author = "MediWise Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mediwise.toml", env = "MEDIWISE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDIWISE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web portal
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Create an administrator account
    CreateAdmin(commands::create_admin::CreateAdminArgs),
}
