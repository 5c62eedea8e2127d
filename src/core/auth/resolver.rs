//! Role resolution
//!
//! Login walks an ordered list of `(role, lookup)` pairs and returns the
//! first role whose table holds a row with the given email and a password
//! that verifies. Emails are matched exactly: no trimming, no case folding.

use super::password::PasswordHasher;
use crate::adapters::database::PortalStore;
use crate::domain::{ProfileRecord, Result, Role};
use async_trait::async_trait;
use std::sync::Arc;

/// Credential lookup over one role's table
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    /// First row whose email equals `email` and whose password verifies
    async fn find_by_credentials(&self, email: &str, password: &str)
        -> Result<Option<ProfileRecord>>;
}

/// [`CredentialLookup`] backed by a [`PortalStore`] table
pub struct StoreLookup {
    role: Role,
    store: Arc<dyn PortalStore + Send + Sync>,
    hasher: PasswordHasher,
}

impl StoreLookup {
    pub fn new(role: Role, store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        Self {
            role,
            store,
            hasher,
        }
    }
}

#[async_trait]
impl CredentialLookup for StoreLookup {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<ProfileRecord>> {
        let candidates = self.store.find_by_email(self.role, email).await?;
        for record in candidates {
            let stored = record.password().to_string();
            if self.hasher.verify_async(password.to_string(), stored).await? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub role: Role,
    pub record: ProfileRecord,
}

/// Ordered credential resolution across role tables
pub struct RoleResolver {
    tables: Vec<(Role, Arc<dyn CredentialLookup>)>,
}

impl RoleResolver {
    pub fn new(tables: Vec<(Role, Arc<dyn CredentialLookup>)>) -> Self {
        Self { tables }
    }

    /// Resolver over every role table of `store`, in [`Role::RESOLUTION_ORDER`]
    pub fn from_store(store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        let tables = Role::RESOLUTION_ORDER
            .into_iter()
            .map(|role| {
                let lookup: Arc<dyn CredentialLookup> =
                    Arc::new(StoreLookup::new(role, store.clone(), hasher));
                (role, lookup)
            })
            .collect();
        Self::new(tables)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.tables.iter().map(|(role, _)| *role).collect()
    }

    /// Returns the first matching role, or `None` when no table matches
    ///
    /// # Errors
    ///
    /// Store failures propagate; they are not treated as a miss.
    pub async fn resolve(&self, email: &str, password: &str) -> Result<Option<Resolution>> {
        for (role, lookup) in &self.tables {
            if let Some(record) = lookup.find_by_credentials(email, password).await? {
                return Ok(Some(Resolution {
                    role: *role,
                    record,
                }));
            }
        }
        Ok(None)
    }
}
