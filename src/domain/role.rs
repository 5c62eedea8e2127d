//! Portal roles
//!
//! [`Role`] covers every kind of account that can log in. [`AccountRole`] is
//! the subset recorded on an account tag; admins are standalone rows and never
//! carry a tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role that can hold a session slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
    Pharmacist,
    Doctor,
}

impl Role {
    /// Login resolution order
    pub const RESOLUTION_ORDER: [Role; 4] =
        [Role::Admin, Role::Patient, Role::Pharmacist, Role::Doctor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Patient => "patient",
            Role::Pharmacist => "pharmacist",
            Role::Doctor => "doctor",
        }
    }

    /// Where a freshly logged-in user of this role lands
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard/",
            Role::Patient => "/patient_dashboard/",
            Role::Pharmacist => "/pharmacist/dashboard/",
            Role::Doctor => "/doctor/dashboard/",
        }
    }

    /// The role's own profile page
    pub fn profile_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin_profile/",
            Role::Patient => "/patient/profile/",
            Role::Pharmacist => "/pharmacist_profile/",
            Role::Doctor => "/doctor/profile/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "patient" => Ok(Role::Patient),
            "pharmacist" => Ok(Role::Pharmacist),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!("Unknown role: '{other}'")),
        }
    }
}

/// Role recorded on an account tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Doctor,
    Patient,
    Pharmacist,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Doctor => "doctor",
            AccountRole::Patient => "patient",
            AccountRole::Pharmacist => "pharmacist",
        }
    }

    /// Roles that may register themselves through `/register/`
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, AccountRole::Patient | AccountRole::Pharmacist)
    }
}

impl From<AccountRole> for Role {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::Doctor => Role::Doctor,
            AccountRole::Patient => Role::Patient,
            AccountRole::Pharmacist => Role::Pharmacist,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(AccountRole::Doctor),
            "patient" => Ok(AccountRole::Patient),
            "pharmacist" => Ok(AccountRole::Pharmacist),
            other => Err(format!("Unknown account role: '{other}'")),
        }
    }
}
