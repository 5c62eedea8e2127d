//! Admin-only management
//!
//! Doctor management is gated by the web layer on an active `admin_id`
//! session slot; admin accounts are provisioned from the command line.

pub mod accounts;
pub mod doctors;

pub use accounts::AdminAccounts;
pub use doctors::DoctorManagement;
