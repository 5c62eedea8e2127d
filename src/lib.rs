// MediWise - Hospital Portal
// Copyright (c) 2025 MediWise Contributors
// Licensed under the MIT License

//! # MediWise - Hospital Portal
//!
//! MediWise is a server-rendered web portal where patients, pharmacists,
//! doctors and administrators sign in and maintain their own profiles.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Registering** patients and pharmacists through a validated form
//! - **Authenticating** against four independent account tables with a
//!   single email/password form and a fixed role probe order
//! - **Tracking** the signed-in identity per role in a server-side session
//! - **Flagging** incomplete profiles on each dashboard
//! - **Managing** doctor accounts from the admin area
//!
//! ## Architecture
//!
//! MediWise follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`web`] - Routes, handlers, templates and the session cookie
//! - [`core`] - Business logic (auth, sessions, registration, profiles, admin)
//! - [`adapters`] - Storage backends (PostgreSQL, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediwise::adapters::database::create_store;
//! use mediwise::config::load_config;
//! use mediwise::web::{self, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("mediwise.toml")?;
//!     let store = create_store(&config).await?;
//!     store.ensure_schema().await?;
//!
//!     let state = AppState::new(&config, store)?;
//!     let listener = tokio::net::TcpListener::bind(config.server.socket_addr()?).await?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     web::serve(listener, state, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Signing In
//!
//! Roles are probed in the order admin, patient, pharmacist, doctor. The
//! first table whose row matches both the email and the password wins, so an
//! email shared across roles signs in as the earliest matching role.
//!
//! ```rust,no_run
//! use mediwise::core::auth::{PasswordHasher, RoleResolver};
//! # use std::sync::Arc;
//! # use mediwise::adapters::database::PortalStore;
//!
//! # async fn example(store: Arc<dyn PortalStore + Send + Sync>) -> mediwise::domain::Result<()> {
//! let resolver = RoleResolver::from_store(store, PasswordHasher::default());
//! if let Some(hit) = resolver.resolve("ann@example.com", "s3cret-pass").await? {
//!     println!("Signed in as {}", hit.role);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! MediWise uses the [`domain::PortalError`] type for all errors. Form
//! problems travel as [`domain::ValidationErrors`] so the page can show a
//! message next to each field.
//!
//! ## Logging
//!
//! MediWise uses structured logging with the `tracing` crate. Passwords are
//! never logged; failed logins carry the email only at debug level.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod web;
