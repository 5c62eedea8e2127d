//! Pharmacist profile

use super::choices::Gender;
use super::ids::{AccountTagId, ProfileId};
use super::profile::ProfileFields;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Pharmacist profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacistProfile {
    pub id: ProfileId,
    pub account_tag: Option<AccountTagId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub gender: Gender,
    pub license_number: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    /// Set once when the row is created
    pub registration_date: NaiveDate,
}

impl PharmacistProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Values collected by pharmacist registration
#[derive(Debug, Clone)]
pub struct NewPharmacist {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub password: String,
    pub license_number: String,
    pub phone_number: String,
    pub address: String,
}

impl ProfileFields for PharmacistProfile {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "first_name" => Some(Cow::Borrowed(&self.first_name)),
            "last_name" => Some(Cow::Borrowed(&self.last_name)),
            "gender" => Some(Cow::Borrowed(self.gender.as_str())),
            "license_number" => Some(Cow::Borrowed(&self.license_number)),
            "phone_number" => Some(Cow::Borrowed(&self.phone_number)),
            "email" => Some(Cow::Borrowed(&self.email)),
            "address" => Some(Cow::Borrowed(&self.address)),
            "registration_date" => Some(Cow::Owned(
                self.registration_date.format("%Y-%m-%d").to_string(),
            )),
            _ => None,
        }
    }
}
