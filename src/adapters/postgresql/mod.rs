//! PostgreSQL store implementation
//!
//! Connection pooling through `deadpool-postgres`; the schema lives in
//! `migrations/001_initial_schema.sql` and is applied by
//! [`PortalStore::ensure_schema`](crate::adapters::database::PortalStore::ensure_schema).

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::{redact_connection_string, PostgreSQLClient};
