//! Self-service profile edits
//!
//! Each role edits its own row. A blank password input keeps the stored
//! password; anything else must pass the eight-character minimum and is
//! stored per the configured password storage.

use crate::adapters::database::PortalStore;
use crate::core::auth::PasswordHasher;
use crate::core::forms::{
    duplicate_message, unique_violation_to_field_error, FieldReader, FormFields, EMAIL_MAX_LENGTH,
};
use crate::domain::{
    AdminProfile, BloodGroup, DoctorProfile, Gender, PatientProfile, PharmacistProfile,
    PortalError, ProfileId, ProfileRecord, Result, Role,
};
use std::sync::Arc;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";

const ADMIN_EMAIL_MAX_LENGTH: usize = 100;

/// Validates and persists profile edits
#[derive(Clone)]
pub struct ProfileUpdater {
    store: Arc<dyn PortalStore + Send + Sync>,
    hasher: PasswordHasher,
}

impl ProfileUpdater {
    pub fn new(store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Dispatches on the record's role
    pub async fn update(&self, record: ProfileRecord, fields: &FormFields) -> Result<ProfileRecord> {
        match record {
            ProfileRecord::Admin(admin) => self.update_admin(admin, fields).await.map(ProfileRecord::Admin),
            ProfileRecord::Patient(patient) => self
                .update_patient(patient, fields)
                .await
                .map(ProfileRecord::Patient),
            ProfileRecord::Pharmacist(pharmacist) => self
                .update_pharmacist(pharmacist, fields)
                .await
                .map(ProfileRecord::Pharmacist),
            ProfileRecord::Doctor(doctor) => self
                .update_doctor(doctor, fields)
                .await
                .map(ProfileRecord::Doctor),
        }
    }

    pub async fn update_patient(
        &self,
        mut patient: PatientProfile,
        fields: &FormFields,
    ) -> Result<PatientProfile> {
        let mut reader = FieldReader::new(fields);
        let first_name = reader.required_text("first_name", Some(100));
        let last_name = reader.required_text("last_name", Some(100));
        let email = reader.optional_email("email", EMAIL_MAX_LENGTH);
        let gender = reader.required_choice::<Gender>("gender");
        let phone_number = reader.optional_text("phone_number", Some(15));
        let address = reader.optional_text("address", None);
        let date_of_birth = reader.optional_date("date_of_birth");
        let blood_group = reader.optional_choice::<BloodGroup>("blood_group");
        let height = reader.required_text("height", Some(10));
        let weight = reader.required_text("weight", Some(10));
        let password = reader.changed_password("password");

        if let Some(email) = email.as_deref() {
            self.check_email(&mut reader, Role::Patient, email, patient.id)
                .await?;
        }
        reader.finish()?;

        if let (Some(first_name), Some(last_name), Some(height), Some(weight)) =
            (first_name, last_name, height, weight)
        {
            patient.first_name = first_name;
            patient.last_name = last_name;
            patient.height = Some(height);
            patient.weight = Some(weight);
        }
        patient.email = email;
        patient.gender = gender;
        patient.phone_number = phone_number;
        patient.address = address;
        patient.date_of_birth = date_of_birth;
        patient.blood_group = blood_group;
        if let Some(password) = password {
            patient.password = self.hasher.hash_async(password).await?;
        }

        self.save(ProfileRecord::Patient(patient))
            .await
            .map(|record| record.into_patient())?
            .ok_or_else(mismatched_role)
    }

    pub async fn update_pharmacist(
        &self,
        mut pharmacist: PharmacistProfile,
        fields: &FormFields,
    ) -> Result<PharmacistProfile> {
        let mut reader = FieldReader::new(fields);
        let first_name = reader.required_text("first_name", Some(100));
        let last_name = reader.required_text("last_name", Some(100));
        let gender = reader.required_choice::<Gender>("gender");
        let phone_number = reader.required_text("phone_number", Some(15));
        let address = reader.required_text("address", None);
        let email = reader.required_email("email", EMAIL_MAX_LENGTH);
        let license_number = reader.required_text("license_number", Some(50));
        let password = reader.changed_password("password");

        if let Some(email) = email.as_deref() {
            self.check_email(&mut reader, Role::Pharmacist, email, pharmacist.id)
                .await?;
        }
        if let Some(license) = license_number.as_deref() {
            if self
                .store
                .license_taken(Role::Pharmacist, license, Some(pharmacist.id))
                .await?
            {
                reader.add_error(
                    "license_number",
                    duplicate_message(Role::Pharmacist, "license_number"),
                );
            }
        }
        reader.finish()?;

        if let (
            Some(first_name),
            Some(last_name),
            Some(gender),
            Some(phone_number),
            Some(address),
            Some(email),
            Some(license_number),
        ) = (
            first_name,
            last_name,
            gender,
            phone_number,
            address,
            email,
            license_number,
        ) {
            pharmacist.first_name = first_name;
            pharmacist.last_name = last_name;
            pharmacist.gender = gender;
            pharmacist.phone_number = phone_number;
            pharmacist.address = address;
            pharmacist.email = email;
            pharmacist.license_number = license_number;
        }
        if let Some(password) = password {
            pharmacist.password = self.hasher.hash_async(password).await?;
        }

        self.save(ProfileRecord::Pharmacist(pharmacist))
            .await
            .map(|record| record.into_pharmacist())?
            .ok_or_else(mismatched_role)
    }

    /// Doctors edit contact and practice details; identity fields are admin-managed
    pub async fn update_doctor(
        &self,
        mut doctor: DoctorProfile,
        fields: &FormFields,
    ) -> Result<DoctorProfile> {
        let mut reader = FieldReader::new(fields);
        let phone_number = reader.optional_text("phone_number", Some(15));
        let description = reader.optional_text("description", None);
        let current_hospital = reader.optional_text("current_hospital", Some(200));
        let address = reader.optional_text("address", None);
        let profile_picture = reader.optional_text("profile_picture", Some(255));
        let password = reader.changed_password("password");
        reader.finish()?;

        doctor.phone_number = phone_number;
        doctor.description = description;
        doctor.current_hospital = current_hospital;
        doctor.address = address;
        doctor.profile_picture = profile_picture;
        if let Some(password) = password {
            doctor.password = self.hasher.hash_async(password).await?;
        }

        self.save(ProfileRecord::Doctor(doctor))
            .await
            .map(|record| record.into_doctor())?
            .ok_or_else(mismatched_role)
    }

    pub async fn update_admin(&self, mut admin: AdminProfile, fields: &FormFields) -> Result<AdminProfile> {
        let mut reader = FieldReader::new(fields);
        let email = reader.required_email("email", ADMIN_EMAIL_MAX_LENGTH);
        let password = reader.changed_password("password");

        if let Some(email) = email.as_deref() {
            self.check_email(&mut reader, Role::Admin, email, admin.id)
                .await?;
        }
        reader.finish()?;

        if let Some(email) = email {
            admin.email = email;
        }
        if let Some(password) = password {
            admin.password = self.hasher.hash_async(password).await?;
        }

        self.save(ProfileRecord::Admin(admin))
            .await
            .map(|record| record.into_admin())?
            .ok_or_else(mismatched_role)
    }

    async fn check_email(
        &self,
        reader: &mut FieldReader<'_>,
        role: Role,
        email: &str,
        owner: ProfileId,
    ) -> Result<()> {
        if self
            .store
            .email_taken(role, email, Some(owner))
            .await?
        {
            reader.add_error("email", duplicate_message(role, "email"));
        }
        Ok(())
    }

    async fn save(&self, record: ProfileRecord) -> Result<ProfileRecord> {
        let role = record.role();
        self.store
            .save_profile(&record)
            .await
            .map_err(|e| unique_violation_to_field_error(role, e))?;
        crate::log_profile_change!(role, record.id(), "updated");
        Ok(record)
    }
}

fn mismatched_role() -> PortalError {
    PortalError::Other("saved record changed role".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::config::PasswordStorage;
    use crate::core::forms::{INVALID_DATE, REQUIRED};
    use crate::core::profile::completeness::{is_incomplete, PATIENT_REQUIRED_FIELDS};
    use crate::domain::{NewAccount, NewAdmin, NewPatient, NewPharmacist};
    use chrono::NaiveDate;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordStorage::Pbkdf2, 1000)
    }

    fn setup() -> (Arc<InMemoryStore>, ProfileUpdater) {
        let store = Arc::new(InMemoryStore::new());
        let updater = ProfileUpdater::new(store.clone(), hasher());
        (store, updater)
    }

    async fn patient(store: &InMemoryStore, email: &str) -> PatientProfile {
        store
            .create_account(NewAccount::Patient(NewPatient {
                email: email.to_string(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                gender: Gender::Female,
                password: hasher().hash("longenough1"),
            }))
            .await
            .unwrap()
            .into_patient()
            .unwrap()
    }

    async fn pharmacist(store: &InMemoryStore, email: &str, license: &str) -> PharmacistProfile {
        store
            .create_account(NewAccount::Pharmacist(NewPharmacist {
                email: email.to_string(),
                first_name: "Phil".to_string(),
                last_name: "Marsh".to_string(),
                gender: Gender::Male,
                password: hasher().hash("longenough1"),
                license_number: license.to_string(),
                phone_number: "555-0101".to_string(),
                address: "1 Pharmacy Rd".to_string(),
            }))
            .await
            .unwrap()
            .into_pharmacist()
            .unwrap()
    }

    fn full_patient_form() -> FormFields {
        FormFields::new()
            .with("first_name", "Ann")
            .with("last_name", "Lee")
            .with("email", "a@x.com")
            .with("gender", "female")
            .with("phone_number", "555-0100")
            .with("address", "2 Clinic Way")
            .with("date_of_birth", "1990-04-12")
            .with("blood_group", "ab+")
            .with("height", "170")
            .with("weight", "65")
            .with("password", "")
    }

    #[tokio::test]
    async fn test_patient_update_completes_profile_and_keeps_password() {
        let (store, updater) = setup();
        let original = patient(&store, "a@x.com").await;
        assert!(is_incomplete(&original, PATIENT_REQUIRED_FIELDS));

        let updated = updater
            .update_patient(original.clone(), &full_patient_form())
            .await
            .unwrap();
        assert!(!is_incomplete(&updated, PATIENT_REQUIRED_FIELDS));
        assert_eq!(updated.password, original.password);
        assert_eq!(updated.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(updated.blood_group, Some(BloodGroup::AbPositive));

        let stored = store
            .load_profile(Role::Patient, original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, ProfileRecord::Patient(updated));
    }

    #[tokio::test]
    async fn test_patient_update_requires_height_and_weight() {
        let (store, updater) = setup();
        let original = patient(&store, "a@x.com").await;
        let form = full_patient_form()
            .with("height", "")
            .with("weight", "12345678901")
            .with("date_of_birth", "soon");
        let err = updater.update_patient(original.clone(), &form).await.unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("height"), [REQUIRED.to_string()]);
        assert!(errors.has("weight"));
        assert_eq!(errors.get("date_of_birth"), [INVALID_DATE.to_string()]);

        let stored = store
            .load_profile(Role::Patient, original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, ProfileRecord::Patient(original));
    }

    #[tokio::test]
    async fn test_patient_email_unique_excluding_self() {
        let (store, updater) = setup();
        let ann = patient(&store, "a@x.com").await;
        patient(&store, "b@x.com").await;

        assert!(updater
            .update_patient(ann.clone(), &full_patient_form())
            .await
            .is_ok());

        let err = updater
            .update_patient(ann, &full_patient_form().with("email", "b@x.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("email"),
            ["A patient with this email already exists.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_new_password_is_hashed_and_short_one_rejected() {
        let (store, updater) = setup();
        let original = patient(&store, "a@x.com").await;

        let err = updater
            .update_patient(original.clone(), &full_patient_form().with("password", "short"))
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has("password"));

        let updated = updater
            .update_patient(original, &full_patient_form().with("password", "brand-new-pass"))
            .await
            .unwrap();
        assert!(hasher().verify("brand-new-pass", &updated.password));
        assert!(!hasher().verify("longenough1", &updated.password));
    }

    #[tokio::test]
    async fn test_pharmacist_update_keeps_registration_date_and_checks_license() {
        let (store, updater) = setup();
        let phil = pharmacist(&store, "p1@x.com", "LIC-1").await;
        pharmacist(&store, "p2@x.com", "LIC-2").await;

        let form = FormFields::new()
            .with("first_name", "Philip")
            .with("last_name", "Marsh")
            .with("gender", "male")
            .with("phone_number", "555-0199")
            .with("address", "3 Pharmacy Rd")
            .with("email", "p1@x.com")
            .with("license_number", "LIC-1");
        let updated = updater.update_pharmacist(phil.clone(), &form).await.unwrap();
        assert_eq!(updated.first_name, "Philip");
        assert_eq!(updated.registration_date, phil.registration_date);

        let err = updater
            .update_pharmacist(updated, &form.with("license_number", "LIC-2"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("license_number"),
            ["A pharmacist with this license number already exists.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_admin_update_and_dispatch() {
        let (store, updater) = setup();
        let admin = store
            .create_admin(NewAdmin {
                email: "root@x.com".to_string(),
                password: hasher().hash("admin-secret"),
            })
            .await
            .unwrap();
        let form = FormFields::new().with("email", "boss@x.com");

        let record = updater
            .update(ProfileRecord::Admin(admin.clone()), &form)
            .await
            .unwrap();
        assert_eq!(record.email(), Some("boss@x.com"));
        assert_eq!(record.password(), admin.password);

        let err = updater
            .update(record, &FormFields::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("email"),
            [REQUIRED.to_string()]
        );
    }
}
