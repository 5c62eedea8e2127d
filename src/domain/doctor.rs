//! Doctor profile
//!
//! Doctors do not register themselves; admins create and maintain them.

use super::choices::Gender;
use super::ids::{AccountTagId, ProfileId};
use super::profile::ProfileFields;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Doctor profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: ProfileId,
    pub account_tag: Option<AccountTagId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub gender: Gender,
    pub email: String,
    pub phone_number: Option<String>,
    pub license_number: String,
    pub description: Option<String>,
    /// Path or URL of the uploaded picture; upload storage lives elsewhere
    pub profile_picture: Option<String>,
    pub current_hospital: Option<String>,
    pub address: Option<String>,
    pub registration_date: NaiveDate,
}

impl DoctorProfile {
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

/// Values collected by the admin "add doctor" form
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub license_number: String,
    pub description: Option<String>,
    pub profile_picture: Option<String>,
    pub current_hospital: Option<String>,
    pub address: Option<String>,
}

impl ProfileFields for DoctorProfile {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "first_name" => Some(Cow::Borrowed(&self.first_name)),
            "last_name" => Some(Cow::Borrowed(&self.last_name)),
            "gender" => Some(Cow::Borrowed(self.gender.as_str())),
            "email" => Some(Cow::Borrowed(&self.email)),
            "phone_number" => self.phone_number.as_deref().map(Cow::Borrowed),
            "license_number" => Some(Cow::Borrowed(&self.license_number)),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            "profile_picture" => self.profile_picture.as_deref().map(Cow::Borrowed),
            "current_hospital" => self.current_hospital.as_deref().map(Cow::Borrowed),
            "address" => self.address.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}
