//! Role-tagged profile records
//!
//! [`ProfileRecord`] is the tagged union returned by credential lookups and
//! by-id fetches, so callers dispatch on the variant instead of on table
//! names.

use super::account::AdminProfile;
use super::doctor::{DoctorProfile, NewDoctor};
use super::ids::{AccountTagId, ProfileId};
use super::patient::{NewPatient, PatientProfile};
use super::pharmacist::{NewPharmacist, PharmacistProfile};
use super::role::{AccountRole, Role};
use serde::Serialize;
use std::borrow::Cow;

/// Named field access used by the completeness evaluator
///
/// Returns `None` for a null column or for a name the record does not know.
pub trait ProfileFields {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// A profile row of any role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileRecord {
    Admin(AdminProfile),
    Patient(PatientProfile),
    Pharmacist(PharmacistProfile),
    Doctor(DoctorProfile),
}

impl ProfileRecord {
    pub fn role(&self) -> Role {
        match self {
            ProfileRecord::Admin(_) => Role::Admin,
            ProfileRecord::Patient(_) => Role::Patient,
            ProfileRecord::Pharmacist(_) => Role::Pharmacist,
            ProfileRecord::Doctor(_) => Role::Doctor,
        }
    }

    pub fn id(&self) -> ProfileId {
        match self {
            ProfileRecord::Admin(a) => a.id,
            ProfileRecord::Patient(p) => p.id,
            ProfileRecord::Pharmacist(p) => p.id,
            ProfileRecord::Doctor(d) => d.id,
        }
    }

    /// Stored email; patients may have none
    pub fn email(&self) -> Option<&str> {
        match self {
            ProfileRecord::Admin(a) => Some(&a.email),
            ProfileRecord::Patient(p) => p.email.as_deref(),
            ProfileRecord::Pharmacist(p) => Some(&p.email),
            ProfileRecord::Doctor(d) => Some(&d.email),
        }
    }

    /// Stored password (hash or raw value)
    pub fn password(&self) -> &str {
        match self {
            ProfileRecord::Admin(a) => &a.password,
            ProfileRecord::Patient(p) => &p.password,
            ProfileRecord::Pharmacist(p) => &p.password,
            ProfileRecord::Doctor(d) => &d.password,
        }
    }

    pub fn account_tag(&self) -> Option<AccountTagId> {
        match self {
            ProfileRecord::Admin(_) => None,
            ProfileRecord::Patient(p) => p.account_tag,
            ProfileRecord::Pharmacist(p) => p.account_tag,
            ProfileRecord::Doctor(d) => d.account_tag,
        }
    }

    pub fn into_admin(self) -> Option<AdminProfile> {
        match self {
            ProfileRecord::Admin(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_patient(self) -> Option<PatientProfile> {
        match self {
            ProfileRecord::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_pharmacist(self) -> Option<PharmacistProfile> {
        match self {
            ProfileRecord::Pharmacist(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_doctor(self) -> Option<DoctorProfile> {
        match self {
            ProfileRecord::Doctor(d) => Some(d),
            _ => None,
        }
    }
}

impl ProfileFields for ProfileRecord {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        match self {
            ProfileRecord::Admin(a) => a.field_value(name),
            ProfileRecord::Patient(p) => p.field_value(name),
            ProfileRecord::Pharmacist(p) => p.field_value(name),
            ProfileRecord::Doctor(d) => d.field_value(name),
        }
    }
}

/// Values for a tag + profile pair created in one transaction
#[derive(Debug, Clone)]
pub enum NewAccount {
    Patient(NewPatient),
    Pharmacist(NewPharmacist),
    Doctor(NewDoctor),
}

impl NewAccount {
    pub fn account_role(&self) -> AccountRole {
        match self {
            NewAccount::Patient(_) => AccountRole::Patient,
            NewAccount::Pharmacist(_) => AccountRole::Pharmacist,
            NewAccount::Doctor(_) => AccountRole::Doctor,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            NewAccount::Patient(p) => &p.email,
            NewAccount::Pharmacist(p) => &p.email,
            NewAccount::Doctor(d) => &d.email,
        }
    }
}
