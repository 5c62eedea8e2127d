//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod create_admin;
pub mod init;
pub mod serve;
pub mod validate;
