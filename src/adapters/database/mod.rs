//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over persistence, allowing
//! the portal to run against PostgreSQL or the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::create_store;
pub use traits::{constraints, PortalStore};
