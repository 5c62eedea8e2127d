//! Self-service registration
//!
//! Patients and pharmacists register themselves. A submission is validated
//! field by field, then checked for uniqueness, then written as an account
//! tag plus profile in one store transaction.

use crate::adapters::database::PortalStore;
use crate::core::auth::PasswordHasher;
use crate::core::forms::{
    duplicate_message, unique_violation_to_field_error, FieldReader, FormFields, EMAIL_MAX_LENGTH,
};
use crate::domain::{
    AccountRole, Gender, NewAccount, NewPatient, NewPharmacist, PortalError, ProfileRecord,
    Result, Role, ValidationErrors,
};
use std::sync::Arc;

pub const INVALID_ROLE: &str = "Select a valid role.";

/// Validates registrations and creates the tag + profile pair
#[derive(Clone)]
pub struct RegistrationFlow {
    store: Arc<dyn PortalStore + Send + Sync>,
    hasher: PasswordHasher,
}

impl RegistrationFlow {
    pub fn new(store: Arc<dyn PortalStore + Send + Sync>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Registers the role named by `role`
    ///
    /// # Errors
    ///
    /// `PortalError::Validation` for bad input, unknown or non-registrable
    /// roles, and duplicates (including ones that only surface at write
    /// time); store errors otherwise.
    pub async fn register(&self, role: &str, fields: &FormFields) -> Result<ProfileRecord> {
        let account_role = role
            .parse::<AccountRole>()
            .ok()
            .filter(AccountRole::is_self_registrable)
            .ok_or_else(|| PortalError::from(ValidationErrors::single("role", INVALID_ROLE)))?;

        let account = match account_role {
            AccountRole::Patient => NewAccount::Patient(self.validate_patient(fields).await?),
            AccountRole::Pharmacist => {
                NewAccount::Pharmacist(self.validate_pharmacist(fields).await?)
            }
            AccountRole::Doctor => {
                return Err(ValidationErrors::single("role", INVALID_ROLE).into());
            }
        };

        let role = Role::from(account_role);
        let record = self
            .store
            .create_account(account)
            .await
            .map_err(|e| unique_violation_to_field_error(role, e))?;

        crate::log_profile_change!(record.role(), record.id(), "registered");
        Ok(record)
    }

    /// Checks `email` against `role`'s table once the format has passed
    async fn check_email(&self, reader: &mut FieldReader<'_>, role: Role, email: Option<&str>) -> Result<()> {
        if let Some(email) = email {
            if self.store.email_taken(role, email, None).await? {
                reader.add_error("email", duplicate_message(role, "email"));
            }
        }
        Ok(())
    }

    async fn validate_patient(&self, fields: &FormFields) -> Result<NewPatient> {
        let mut reader = FieldReader::new(fields);
        let email = reader.required_email("email", EMAIL_MAX_LENGTH);
        let first_name = reader.required_text("first_name", Some(100));
        let last_name = reader.required_text("last_name", Some(100));
        let gender = reader.required_choice::<Gender>("gender");
        let password = reader.new_password("password");

        self.check_email(&mut reader, Role::Patient, email.as_deref())
            .await?;

        match (email, first_name, last_name, gender, password) {
            (Some(email), Some(first_name), Some(last_name), Some(gender), Some(password))
                if reader.errors().is_empty() =>
            {
                Ok(NewPatient {
                    email,
                    first_name,
                    last_name,
                    gender,
                    password: self.hasher.hash_async(password).await?,
                })
            }
            _ => Err(reader.finish().err().unwrap_or_else(incomplete_form)),
        }
    }

    async fn validate_pharmacist(&self, fields: &FormFields) -> Result<NewPharmacist> {
        let mut reader = FieldReader::new(fields);
        let email = reader.required_email("email", EMAIL_MAX_LENGTH);
        let first_name = reader.required_text("first_name", Some(100));
        let last_name = reader.required_text("last_name", Some(100));
        let gender = reader.required_choice::<Gender>("gender");
        let password = reader.new_password("password");
        let license_number = reader.required_text("license_number", Some(50));
        let phone_number = reader.required_text("phone_number", Some(15));
        let address = reader.required_text("address", None);

        self.check_email(&mut reader, Role::Pharmacist, email.as_deref())
            .await?;
        if let Some(license) = license_number.as_deref() {
            if self
                .store
                .license_taken(Role::Pharmacist, license, None)
                .await?
            {
                reader.add_error(
                    "license_number",
                    duplicate_message(Role::Pharmacist, "license_number"),
                );
            }
        }

        if !reader.errors().is_empty() {
            return Err(reader.finish().err().unwrap_or_else(incomplete_form));
        }
        match (
            email,
            first_name,
            last_name,
            gender,
            password,
            license_number,
            phone_number,
            address,
        ) {
            (
                Some(email),
                Some(first_name),
                Some(last_name),
                Some(gender),
                Some(password),
                Some(license_number),
                Some(phone_number),
                Some(address),
            ) => Ok(NewPharmacist {
                email,
                first_name,
                last_name,
                gender,
                password: self.hasher.hash_async(password).await?,
                license_number,
                phone_number,
                address,
            }),
            _ => Err(incomplete_form()),
        }
    }
}

// Every `None` above has recorded an error, so this is unreachable in practice.
fn incomplete_form() -> PortalError {
    PortalError::Other("form validation left a field unset".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::config::PasswordStorage;
    use crate::core::auth::password::is_hashed;
    use crate::core::forms::{INVALID_EMAIL, REQUIRED};

    fn flow_with(storage: PasswordStorage) -> (Arc<InMemoryStore>, RegistrationFlow) {
        let store = Arc::new(InMemoryStore::new());
        let flow = RegistrationFlow::new(store.clone(), PasswordHasher::new(storage, 1000));
        (store, flow)
    }

    fn flow() -> (Arc<InMemoryStore>, RegistrationFlow) {
        flow_with(PasswordStorage::Pbkdf2)
    }

    fn patient_form(email: &str) -> FormFields {
        FormFields::new()
            .with("email", email)
            .with("first_name", " Ann ")
            .with("last_name", "Lee")
            .with("gender", "female")
            .with("password", "longenough1")
    }

    fn pharmacist_form(email: &str, license: &str) -> FormFields {
        FormFields::new()
            .with("email", email)
            .with("first_name", "Phil")
            .with("last_name", "Marsh")
            .with("gender", "male")
            .with("password", "longenough1")
            .with("license_number", license)
            .with("phone_number", "555-0101")
            .with("address", "1 Pharmacy Rd")
    }

    #[tokio::test]
    async fn test_register_patient_creates_tag_and_hashed_profile() {
        let (store, flow) = flow();
        let record = flow.register("patient", &patient_form("a@x.com")).await.unwrap();

        let patient = record.clone().into_patient().unwrap();
        assert_eq!(patient.first_name, "Ann");
        assert_eq!(patient.email.as_deref(), Some("a@x.com"));
        assert!(is_hashed(&patient.password));
        assert_ne!(patient.password, "longenough1");

        let tag = store
            .get_account_tag(record.account_tag().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tag.role, AccountRole::Patient);
    }

    #[tokio::test]
    async fn test_plaintext_storage_keeps_raw_password() {
        let (_, flow) = flow_with(PasswordStorage::Plaintext);
        let record = flow.register("patient", &patient_form("a@x.com")).await.unwrap();
        assert_eq!(record.password(), "longenough1");
    }

    #[tokio::test]
    async fn test_duplicate_patient_email_rejected() {
        let (store, flow) = flow();
        let first = flow.register("patient", &patient_form("a@x.com")).await.unwrap();

        let err = flow
            .register("patient", &patient_form("a@x.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("email"),
            ["A patient with this email already exists.".to_string()]
        );
        assert_eq!(store.count_profiles(Role::Patient).await.unwrap(), 1);
        assert_eq!(store.count_account_tags().await.unwrap(), 1);
        let unchanged = store
            .load_profile(Role::Patient, first.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged, first);
    }

    #[tokio::test]
    async fn test_duplicate_pharmacist_license_rejected_with_unique_email() {
        let (_, flow) = flow();
        flow.register("pharmacist", &pharmacist_form("p1@x.com", "LIC-1"))
            .await
            .unwrap();

        let err = flow
            .register("pharmacist", &pharmacist_form("p2@x.com", "LIC-1"))
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(
            errors.get("license_number"),
            ["A pharmacist with this license number already exists.".to_string()]
        );
        assert!(!errors.has("email"));
    }

    #[tokio::test]
    async fn test_patient_registration_ignores_license_numbers() {
        let (_, flow) = flow();
        flow.register("pharmacist", &pharmacist_form("p@x.com", "LIC-1"))
            .await
            .unwrap();
        let form = patient_form("pat@x.com").with("license_number", "LIC-1");
        assert!(flow.register("patient", &form).await.is_ok());
    }

    #[tokio::test]
    async fn test_email_may_repeat_across_roles() {
        let (_, flow) = flow();
        flow.register("patient", &patient_form("same@x.com")).await.unwrap();
        assert!(flow
            .register("pharmacist", &pharmacist_form("same@x.com", "LIC-2"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_fields_are_reported_together_and_skip_uniqueness() {
        let (store, flow) = flow();
        let form = FormFields::new()
            .with("email", "not-an-email")
            .with("gender", "female")
            .with("password", "short");
        let err = flow.register("patient", &form).await.unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("email"), [INVALID_EMAIL.to_string()]);
        assert_eq!(errors.get("first_name"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("last_name"), [REQUIRED.to_string()]);
        assert!(errors.has("password"));
        assert_eq!(store.count_account_tags().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_doctor_roles_rejected() {
        let (store, flow) = flow();
        for role in ["doctor", "admin", "", "Patient"] {
            let err = flow.register(role, &patient_form("a@x.com")).await.unwrap_err();
            assert_eq!(
                err.validation_errors().unwrap().get("role"),
                [INVALID_ROLE.to_string()]
            );
        }
        assert_eq!(store.count_account_tags().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_time_duplicate_becomes_field_error() {
        // Seed a row that validation cannot see coming: an untagged patient
        // inserted after the uniqueness check would have run.
        let (store, flow) = flow();
        let record = flow.register("patient", &patient_form("a@x.com")).await.unwrap();
        let err = store
            .create_account(NewAccount::Patient(NewPatient {
                email: "a@x.com".to_string(),
                first_name: "B".to_string(),
                last_name: "C".to_string(),
                gender: Gender::Other,
                password: "x".to_string(),
            }))
            .await
            .map_err(|e| unique_violation_to_field_error(Role::Patient, e))
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has("email"));
        assert_eq!(store.count_account_tags().await.unwrap(), 1);
        assert!(record.account_tag().is_some());
    }
}
