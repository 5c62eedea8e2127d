//! Patient profile

use super::choices::{BloodGroup, Gender};
use super::ids::{AccountTagId, ProfileId};
use super::profile::ProfileFields;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Patient profile row
///
/// Demographic and contact fields are optional at registration and are
/// filled in later through the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: ProfileId,
    pub account_tag: Option<AccountTagId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl PatientProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Values collected by patient registration
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub password: String,
}

impl ProfileFields for PatientProfile {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "first_name" => Some(Cow::Borrowed(&self.first_name)),
            "last_name" => Some(Cow::Borrowed(&self.last_name)),
            "gender" => self.gender.map(|g| Cow::Borrowed(g.as_str())),
            "blood_group" => self.blood_group.map(|b| Cow::Borrowed(b.as_str())),
            "date_of_birth" => self
                .date_of_birth
                .map(|d| Cow::Owned(d.format("%Y-%m-%d").to_string())),
            "phone_number" => self.phone_number.as_deref().map(Cow::Borrowed),
            "height" => self.height.as_deref().map(Cow::Borrowed),
            "weight" => self.weight.as_deref().map(Cow::Borrowed),
            "email" => self.email.as_deref().map(Cow::Borrowed),
            "address" => self.address.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}
