//! Admin-managed doctor records
//!
//! Doctors cannot register themselves. An admin adds them (tag + profile in
//! one transaction), edits them with the same form, and deletes them through
//! their account tag.

use crate::adapters::database::PortalStore;
use crate::core::auth::PasswordHasher;
use crate::core::forms::{
    duplicate_message, unique_violation_to_field_error, FieldReader, FormFields, EMAIL_MAX_LENGTH,
};
use crate::domain::{
    DoctorProfile, Gender, NewAccount, NewDoctor, PortalError, ProfileId, ProfileRecord, Result,
    Role,
};
use std::sync::Arc;

pub const DOCTOR_ADDED: &str = "Doctor added successfully.";
pub const DOCTOR_UPDATED: &str = "Doctor updated successfully.";
pub const DOCTOR_DELETED: &str = "Doctor deleted successfully.";
pub const DOCTOR_NOT_FOUND: &str = "Doctor not found.";

/// Validated doctor form; `password` is `None` when an edit leaves it blank
struct DoctorForm {
    first_name: String,
    last_name: String,
    email: String,
    password: Option<String>,
    gender: Gender,
    phone_number: Option<String>,
    license_number: String,
    description: Option<String>,
    profile_picture: Option<String>,
    current_hospital: Option<String>,
    address: Option<String>,
}

/// Add / edit / delete / list over doctors
#[derive(Clone)]
pub struct DoctorManagement {
    store: Arc<dyn PortalStore + Send + Sync>,
    hasher: PasswordHasher,
}

impl DoctorManagement {
    pub fn new(store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub async fn list(&self) -> Result<Vec<DoctorProfile>> {
        self.store.list_doctors().await
    }

    pub async fn add(&self, fields: &FormFields) -> Result<DoctorProfile> {
        let form = self.read_form(fields, None).await?;
        let password = form
            .password
            .ok_or_else(|| PortalError::Other("new doctor without a password".to_string()))?;

        let account = NewAccount::Doctor(NewDoctor {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            password: self.hasher.hash_async(password).await?,
            gender: form.gender,
            phone_number: form.phone_number,
            license_number: form.license_number,
            description: form.description,
            profile_picture: form.profile_picture,
            current_hospital: form.current_hospital,
            address: form.address,
        });
        let doctor = self
            .store
            .create_account(account)
            .await
            .map_err(|e| unique_violation_to_field_error(Role::Doctor, e))?
            .into_doctor()
            .ok_or_else(|| PortalError::Other("created account is not a doctor".to_string()))?;

        crate::log_profile_change!(Role::Doctor, doctor.id, "added by admin");
        Ok(doctor)
    }

    /// Applies the form to an existing doctor; a blank password keeps the stored one
    pub async fn edit(&self, id: ProfileId, fields: &FormFields) -> Result<DoctorProfile> {
        let mut doctor = self
            .store
            .load_profile(Role::Doctor, id)
            .await?
            .and_then(ProfileRecord::into_doctor)
            .ok_or_else(|| PortalError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        let form = self.read_form(fields, Some(id)).await?;
        doctor.first_name = form.first_name;
        doctor.last_name = form.last_name;
        doctor.email = form.email;
        doctor.gender = form.gender;
        doctor.phone_number = form.phone_number;
        doctor.license_number = form.license_number;
        doctor.description = form.description;
        doctor.profile_picture = form.profile_picture;
        doctor.current_hospital = form.current_hospital;
        doctor.address = form.address;
        if let Some(password) = form.password {
            doctor.password = self.hasher.hash_async(password).await?;
        }

        let record = ProfileRecord::Doctor(doctor);
        self.store
            .save_profile(&record)
            .await
            .map_err(|e| unique_violation_to_field_error(Role::Doctor, e))?;
        crate::log_profile_change!(Role::Doctor, id, "edited by admin");
        record
            .into_doctor()
            .ok_or_else(|| PortalError::Other("saved record is not a doctor".to_string()))
    }

    /// # Errors
    ///
    /// `PortalError::NotFound` when no doctor has `id`.
    pub async fn delete(&self, id: ProfileId) -> Result<()> {
        if !self.store.delete_doctor(id).await? {
            return Err(PortalError::NotFound(DOCTOR_NOT_FOUND.to_string()));
        }
        crate::log_profile_change!(Role::Doctor, id, "deleted by admin");
        Ok(())
    }

    /// `existing` is the doctor being edited, excluded from uniqueness checks
    async fn read_form(&self, fields: &FormFields, existing: Option<ProfileId>) -> Result<DoctorForm> {
        let mut reader = FieldReader::new(fields);
        let first_name = reader.required_text("first_name", Some(100));
        let last_name = reader.required_text("last_name", Some(100));
        let email = reader.required_email("email", EMAIL_MAX_LENGTH);
        let password = match existing {
            Some(_) => reader.changed_password("password"),
            None => reader.new_password("password"),
        };
        let gender = reader.required_choice::<Gender>("gender");
        let phone_number = reader.optional_text("phone_number", Some(15));
        let license_number = reader.required_text("license_number", Some(50));
        let description = reader.optional_text("description", None);
        let current_hospital = reader.optional_text("current_hospital", Some(200));
        let address = reader.optional_text("address", None);
        let profile_picture = reader.optional_text("profile_picture", Some(255));

        if let Some(email) = email.as_deref() {
            if self.store.email_taken(Role::Doctor, email, existing).await? {
                reader.add_error("email", duplicate_message(Role::Doctor, "email"));
            }
        }
        if let Some(license) = license_number.as_deref() {
            if self
                .store
                .license_taken(Role::Doctor, license, existing)
                .await?
            {
                reader.add_error(
                    "license_number",
                    duplicate_message(Role::Doctor, "license_number"),
                );
            }
        }
        reader.finish()?;

        match (first_name, last_name, email, gender, license_number) {
            (Some(first_name), Some(last_name), Some(email), Some(gender), Some(license_number)) => {
                Ok(DoctorForm {
                    first_name,
                    last_name,
                    email,
                    password,
                    gender,
                    phone_number,
                    license_number,
                    description,
                    profile_picture,
                    current_hospital,
                    address,
                })
            }
            _ => Err(PortalError::Other(
                "doctor form validated with a field unset".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::config::PasswordStorage;
    use crate::core::forms::REQUIRED;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordStorage::Pbkdf2, 1000)
    }

    fn setup() -> (Arc<InMemoryStore>, DoctorManagement) {
        let store = Arc::new(InMemoryStore::new());
        let doctors = DoctorManagement::new(store.clone(), hasher());
        (store, doctors)
    }

    fn doctor_form(email: &str, license: &str) -> FormFields {
        FormFields::new()
            .with("first_name", "Gregory")
            .with("last_name", "House")
            .with("email", email)
            .with("password", "vicodin-free")
            .with("gender", "male")
            .with("license_number", license)
            .with("current_hospital", "Princeton-Plainsboro")
    }

    #[tokio::test]
    async fn test_add_creates_tagged_doctor_with_hashed_password() {
        let (store, doctors) = setup();
        let doctor = doctors.add(&doctor_form("house@x.com", "MD-1")).await.unwrap();

        assert!(doctor.account_tag.is_some());
        assert!(hasher().verify("vicodin-free", &doctor.password));
        assert_eq!(doctor.current_hospital.as_deref(), Some("Princeton-Plainsboro"));
        assert_eq!(doctors.list().await.unwrap(), vec![doctor]);
        assert_eq!(store.count_account_tags().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_requires_password_and_license() {
        let (store, doctors) = setup();
        let form = doctor_form("house@x.com", "").with("password", "");
        let err = doctors.add(&form).await.unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("password"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("license_number"), [REQUIRED.to_string()]);
        assert_eq!(store.count_profiles(Role::Doctor).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_email_and_license() {
        let (_, doctors) = setup();
        doctors.add(&doctor_form("house@x.com", "MD-1")).await.unwrap();

        let err = doctors
            .add(&doctor_form("house@x.com", "MD-1"))
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(
            errors.get("email"),
            ["A doctor with this email already exists.".to_string()]
        );
        assert_eq!(
            errors.get("license_number"),
            ["A doctor with this license number already exists.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_edit_keeps_password_when_blank_and_excludes_self() {
        let (_, doctors) = setup();
        let doctor = doctors.add(&doctor_form("house@x.com", "MD-1")).await.unwrap();

        let form = doctor_form("house@x.com", "MD-1")
            .with("password", "")
            .with("description", "Diagnostics");
        let edited = doctors.edit(doctor.id, &form).await.unwrap();
        assert_eq!(edited.password, doctor.password);
        assert_eq!(edited.description.as_deref(), Some("Diagnostics"));
        assert_eq!(edited.registration_date, doctor.registration_date);
        assert_eq!(edited.account_tag, doctor.account_tag);
    }

    #[tokio::test]
    async fn test_edit_rejects_another_doctors_license() {
        let (_, doctors) = setup();
        let house = doctors.add(&doctor_form("house@x.com", "MD-1")).await.unwrap();
        doctors.add(&doctor_form("wilson@x.com", "MD-2")).await.unwrap();

        let err = doctors
            .edit(house.id, &doctor_form("house@x.com", "MD-2"))
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has("license_number"));
    }

    #[tokio::test]
    async fn test_delete_removes_doctor_and_tag() {
        let (store, doctors) = setup();
        let doctor = doctors.add(&doctor_form("house@x.com", "MD-1")).await.unwrap();

        doctors.delete(doctor.id).await.unwrap();
        assert!(doctors.list().await.unwrap().is_empty());
        assert_eq!(store.count_account_tags().await.unwrap(), 0);

        let err = doctors.delete(doctor.id).await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
        let err = doctors
            .edit(doctor.id, &doctor_form("house@x.com", "MD-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }
}
