//! Domain models and types for MediWise.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ProfileId`], [`AccountTagId`])
//! - **Roles** ([`Role`], [`AccountRole`])
//! - **Profile models** ([`AdminProfile`], [`PatientProfile`],
//!   [`PharmacistProfile`], [`DoctorProfile`]) and the tagged union
//!   [`ProfileRecord`]
//! - **Error types** ([`PortalError`], [`StoreError`], [`ValidationErrors`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PortalError>`]:
//!
//! ```rust,no_run
//! use mediwise::domain::{PortalError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = mediwise::config::load_config("mediwise.toml")?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod choices;
pub mod doctor;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod pharmacist;
pub mod profile;
pub mod result;
pub mod role;

// Re-export commonly used types for convenience
pub use account::{AccountTag, AdminProfile, NewAdmin};
pub use choices::{BloodGroup, Gender};
pub use doctor::{DoctorProfile, NewDoctor};
pub use errors::{PortalError, StoreError, ValidationErrors};
pub use ids::{AccountTagId, ProfileId};
pub use patient::{NewPatient, PatientProfile};
pub use pharmacist::{NewPharmacist, PharmacistProfile};
pub use profile::{NewAccount, ProfileFields, ProfileRecord};
pub use result::Result;
pub use role::{AccountRole, Role};
