//! Profile completeness and self-service edits

pub mod completeness;
pub mod update;

pub use completeness::{is_incomplete, missing_fields, required_fields};
pub use update::{ProfileUpdater, PROFILE_UPDATED};
