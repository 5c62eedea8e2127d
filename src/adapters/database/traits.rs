//! Store abstraction traits
//!
//! This module defines the trait that persistence adapters implement to back
//! the portal's credential, registration and profile flows.

use crate::domain::{
    AccountTag, AccountTagId, AdminProfile, DoctorProfile, NewAccount, NewAdmin, ProfileId,
    ProfileRecord, Result, Role,
};
use async_trait::async_trait;

/// Persistence for account tags and the four profile tables
///
/// Uniqueness is enforced per table: a write that collides with an existing
/// email or license number fails with `StoreError::UniqueViolation` carrying
/// the constraint name (see [`constraints`]).
#[async_trait]
pub trait PortalStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Test the database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create the schema if it does not exist yet; safe to call repeatedly
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    async fn ensure_schema(&self) -> Result<()>;

    /// Rows of `role`'s table whose stored email equals `email` exactly
    async fn find_by_email(&self, role: Role, email: &str) -> Result<Vec<ProfileRecord>>;

    /// Re-fetch a profile by primary key
    async fn load_profile(&self, role: Role, id: ProfileId) -> Result<Option<ProfileRecord>>;

    /// Whether another row of `role` already uses `email`
    async fn email_taken(&self, role: Role, email: &str, exclude: Option<ProfileId>)
        -> Result<bool>;

    /// Whether another row of `role` already uses `license_number`
    ///
    /// Always false for roles without a license column.
    async fn license_taken(
        &self,
        role: Role,
        license_number: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool>;

    /// Creates an account tag and its profile atomically
    ///
    /// # Errors
    ///
    /// On failure neither row persists.
    async fn create_account(&self, account: NewAccount) -> Result<ProfileRecord>;

    /// Inserts a standalone admin row
    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminProfile>;

    /// Writes every mutable column of an existing profile
    ///
    /// # Errors
    ///
    /// Returns `PortalError::NotFound` if the row no longer exists.
    async fn save_profile(&self, record: &ProfileRecord) -> Result<()>;

    /// All doctors ordered by id
    async fn list_doctors(&self) -> Result<Vec<DoctorProfile>>;

    /// Removes a doctor through its account tag (cascading), or directly when
    /// it has none. Returns false when no such doctor exists.
    async fn delete_doctor(&self, id: ProfileId) -> Result<bool>;

    async fn get_account_tag(&self, id: AccountTagId) -> Result<Option<AccountTag>>;

    async fn count_profiles(&self, role: Role) -> Result<u64>;

    async fn count_account_tags(&self) -> Result<u64>;
}

/// Unique constraint names shared by the SQL schema and the in-memory store
pub mod constraints {
    pub const ADMINS_EMAIL: &str = "admins_email_unique";
    pub const PATIENTS_EMAIL: &str = "patients_email_unique";
    pub const PHARMACISTS_EMAIL: &str = "pharmacists_email_unique";
    pub const PHARMACISTS_LICENSE: &str = "pharmacists_license_number_unique";
    pub const DOCTORS_EMAIL: &str = "doctors_email_unique";
    pub const DOCTORS_LICENSE: &str = "doctors_license_number_unique";

    /// Form field a violated constraint belongs to
    pub fn field_for(constraint: &str) -> Option<&'static str> {
        match constraint {
            ADMINS_EMAIL | PATIENTS_EMAIL | PHARMACISTS_EMAIL | DOCTORS_EMAIL => Some("email"),
            PHARMACISTS_LICENSE | DOCTORS_LICENSE => Some("license_number"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::constraints::*;

    #[test]
    fn test_constraint_fields() {
        assert_eq!(field_for(PATIENTS_EMAIL), Some("email"));
        assert_eq!(field_for(DOCTORS_LICENSE), Some("license_number"));
        assert_eq!(field_for("account_tags_pkey"), None);
    }
}
