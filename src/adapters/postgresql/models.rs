//! Row mapping for the profile tables
//!
//! Column lists and `Row` → domain conversions. Choice columns are stored as
//! their lowercase codes and parsed back into enums here.

use crate::domain::{
    AccountRole, AccountTag, AccountTagId, AdminProfile, BloodGroup, DoctorProfile, Gender,
    PatientProfile, PharmacistProfile, ProfileId, ProfileRecord, Result, Role, StoreError,
};
use std::str::FromStr;
use tokio_postgres::Row;

pub const ADMIN_COLUMNS: &str = "id, email, password";

pub const PATIENT_COLUMNS: &str = "id, account_tag_id, first_name, last_name, password, gender, \
     blood_group, date_of_birth, phone_number, height, weight, email, address";

pub const PHARMACIST_COLUMNS: &str = "id, account_tag_id, first_name, last_name, password, \
     gender, license_number, phone_number, email, address, registration_date";

pub const DOCTOR_COLUMNS: &str = "id, account_tag_id, first_name, last_name, password, gender, \
     email, phone_number, license_number, description, profile_picture, current_hospital, \
     address, registration_date";

/// Table and column list for a role
pub fn table_for(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Admin => ("admins", ADMIN_COLUMNS),
        Role::Patient => ("patients", PATIENT_COLUMNS),
        Role::Pharmacist => ("pharmacists", PHARMACIST_COLUMNS),
        Role::Doctor => ("doctors", DOCTOR_COLUMNS),
    }
}

fn get<'a, T>(row: &'a Row, column: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column)
        .map_err(|e| StoreError::InvalidRow(format!("column {column}: {e}")).into())
}

fn parse_choice<T: FromStr<Err = String>>(column: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|e: String| StoreError::InvalidRow(format!("column {column}: {e}")).into())
}

fn tag_id(row: &Row) -> Result<Option<AccountTagId>> {
    Ok(get::<Option<i64>>(row, "account_tag_id")?.map(AccountTagId::new))
}

pub fn admin_from_row(row: &Row) -> Result<AdminProfile> {
    Ok(AdminProfile {
        id: ProfileId::new(get(row, "id")?),
        email: get(row, "email")?,
        password: get(row, "password")?,
    })
}

pub fn patient_from_row(row: &Row) -> Result<PatientProfile> {
    let gender: Option<String> = get(row, "gender")?;
    let blood_group: Option<String> = get(row, "blood_group")?;
    Ok(PatientProfile {
        id: ProfileId::new(get(row, "id")?),
        account_tag: tag_id(row)?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        password: get(row, "password")?,
        gender: gender
            .as_deref()
            .map(|g| parse_choice::<Gender>("gender", g))
            .transpose()?,
        blood_group: blood_group
            .as_deref()
            .map(|b| parse_choice::<BloodGroup>("blood_group", b))
            .transpose()?,
        date_of_birth: get(row, "date_of_birth")?,
        phone_number: get(row, "phone_number")?,
        height: get(row, "height")?,
        weight: get(row, "weight")?,
        email: get(row, "email")?,
        address: get(row, "address")?,
    })
}

pub fn pharmacist_from_row(row: &Row) -> Result<PharmacistProfile> {
    let gender: String = get(row, "gender")?;
    Ok(PharmacistProfile {
        id: ProfileId::new(get(row, "id")?),
        account_tag: tag_id(row)?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        password: get(row, "password")?,
        gender: parse_choice("gender", &gender)?,
        license_number: get(row, "license_number")?,
        phone_number: get(row, "phone_number")?,
        email: get(row, "email")?,
        address: get(row, "address")?,
        registration_date: get(row, "registration_date")?,
    })
}

pub fn doctor_from_row(row: &Row) -> Result<DoctorProfile> {
    let gender: String = get(row, "gender")?;
    Ok(DoctorProfile {
        id: ProfileId::new(get(row, "id")?),
        account_tag: tag_id(row)?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        password: get(row, "password")?,
        gender: parse_choice("gender", &gender)?,
        email: get(row, "email")?,
        phone_number: get(row, "phone_number")?,
        license_number: get(row, "license_number")?,
        description: get(row, "description")?,
        profile_picture: get(row, "profile_picture")?,
        current_hospital: get(row, "current_hospital")?,
        address: get(row, "address")?,
        registration_date: get(row, "registration_date")?,
    })
}

/// Maps a row selected with `table_for(role)` columns
pub fn record_from_row(role: Role, row: &Row) -> Result<ProfileRecord> {
    Ok(match role {
        Role::Admin => ProfileRecord::Admin(admin_from_row(row)?),
        Role::Patient => ProfileRecord::Patient(patient_from_row(row)?),
        Role::Pharmacist => ProfileRecord::Pharmacist(pharmacist_from_row(row)?),
        Role::Doctor => ProfileRecord::Doctor(doctor_from_row(row)?),
    })
}

pub fn account_tag_from_row(row: &Row) -> Result<AccountTag> {
    let role: String = get(row, "role")?;
    Ok(AccountTag {
        id: AccountTagId::new(get(row, "id")?),
        role: parse_choice::<AccountRole>("role", &role)?,
    })
}
