//! Request handlers, one module per area of the portal

pub mod admin;
pub mod auth;
pub mod pages;
pub mod profile;

use crate::domain::ProfileRecord;

/// Name shown in page headings
pub(crate) fn display_name(record: &ProfileRecord) -> String {
    match record {
        ProfileRecord::Admin(admin) => admin.email.clone(),
        ProfileRecord::Patient(patient) => patient.full_name(),
        ProfileRecord::Pharmacist(pharmacist) => pharmacist.full_name(),
        ProfileRecord::Doctor(doctor) => doctor.full_name(),
    }
}
