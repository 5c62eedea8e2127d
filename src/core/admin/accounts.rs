//! Admin account provisioning
//!
//! Admins cannot self-register; operators create them from the command line.

use crate::adapters::database::PortalStore;
use crate::core::auth::PasswordHasher;
use crate::core::forms::{duplicate_message, unique_violation_to_field_error, FieldReader, FormFields};
use crate::domain::{AdminProfile, NewAdmin, PortalError, Result, Role};
use std::sync::Arc;

const ADMIN_EMAIL_MAX_LENGTH: usize = 100;

#[derive(Clone)]
pub struct AdminAccounts {
    store: Arc<dyn PortalStore + Send + Sync>,
    hasher: PasswordHasher,
}

impl AdminAccounts {
    pub fn new(store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Validates and inserts an admin
    ///
    /// # Errors
    ///
    /// `PortalError::Validation` for a malformed or taken email or a short
    /// password.
    pub async fn create(&self, email: &str, password: &str) -> Result<AdminProfile> {
        let fields = FormFields::new()
            .with("email", email)
            .with("password", password);
        let mut reader = FieldReader::new(&fields);
        let email = reader.required_email("email", ADMIN_EMAIL_MAX_LENGTH);
        let password = reader.new_password("password");

        if let Some(email) = email.as_deref() {
            if self.store.email_taken(Role::Admin, email, None).await? {
                reader.add_error("email", duplicate_message(Role::Admin, "email"));
            }
        }
        reader.finish()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(PortalError::Other("admin form validated with a field unset".to_string()));
        };
        let admin = self
            .store
            .create_admin(NewAdmin {
                email,
                password: self.hasher.hash_async(password).await?,
            })
            .await
            .map_err(|e| unique_violation_to_field_error(Role::Admin, e))?;

        crate::log_profile_change!(Role::Admin, admin.id, "created");
        Ok(admin)
    }
}
