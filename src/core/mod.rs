//! Core business logic for MediWise.
//!
//! # Modules
//!
//! - [`auth`] - Password storage and ordered role resolution
//! - [`session`] - Server-side sessions with one slot per role
//! - [`profile`] - Profile completeness and self-service edits
//! - [`registration`] - Patient and pharmacist self-registration
//! - [`admin`] - Admin-managed doctor records
//! - [`forms`] - Submitted form values and field validation
//!
//! # Login Workflow
//!
//! 1. **Resolve**: [`auth::RoleResolver`] walks admin, patient, pharmacist,
//!    doctor and returns the first table whose row matches
//! 2. **Establish**: [`session::SessionManager`] writes that role's slot
//! 3. **Render**: the dashboard re-fetches the record by id and flags it
//!    when [`profile::is_incomplete`] reports missing fields
//!
//! # Example
//!
//! ```rust,no_run
//! use mediwise::adapters::memory::InMemoryStore;
//! use mediwise::core::auth::{PasswordHasher, RoleResolver};
//! use mediwise::core::forms::FormFields;
//! use mediwise::core::registration::RegistrationFlow;
//! use std::sync::Arc;
//!
//! # async fn example() -> mediwise::domain::Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let hasher = PasswordHasher::default();
//!
//! let registration = RegistrationFlow::new(store.clone(), hasher);
//! let fields = FormFields::new()
//!     .with("email", "a@x.com")
//!     .with("first_name", "Ann")
//!     .with("last_name", "Lee")
//!     .with("gender", "female")
//!     .with("password", "longenough1");
//! registration.register("patient", &fields).await?;
//!
//! let resolver = RoleResolver::from_store(store, hasher);
//! let resolution = resolver.resolve("a@x.com", "longenough1").await?;
//! assert!(resolution.is_some());
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod forms;
pub mod profile;
pub mod registration;
pub mod session;
