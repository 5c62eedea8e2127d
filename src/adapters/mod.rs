//! Persistence adapters for MediWise.
//!
//! - [`database`] - Store trait and factory
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-process implementation for development and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use mediwise::adapters::database::create_store;
//! use mediwise::config::PortalConfig;
//!
//! # async fn example() -> mediwise::domain::Result<()> {
//! let store = create_store(&PortalConfig::in_memory()).await?;
//! store.ensure_schema().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
