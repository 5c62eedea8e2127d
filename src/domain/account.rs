//! Account tags and admin profiles

use super::ids::{AccountTagId, ProfileId};
use super::profile::ProfileFields;
use super::role::AccountRole;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Role-classification record created once per registrant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTag {
    pub id: AccountTagId,
    pub role: AccountRole,
}

/// Standalone administrative account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: ProfileId,
    pub email: String,
    /// Stored password: a `pbkdf2_sha256$...` hash, or the raw value in plaintext mode
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Values for a new admin row
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub password: String,
}

impl ProfileFields for AdminProfile {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "email" => Some(Cow::Borrowed(self.email.as_str())),
            _ => None,
        }
    }
}
