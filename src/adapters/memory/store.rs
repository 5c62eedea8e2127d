//! Process-local store
//!
//! All tables sit behind one `tokio::sync::RwLock`, so every write
//! (including tag + profile creation) is atomic with respect to other
//! requests. Unique constraints mirror the SQL schema and report the same
//! constraint names.

use crate::adapters::database::constraints;
use crate::adapters::database::traits::PortalStore;
use crate::domain::{
    AccountTag, AccountTagId, AdminProfile, DoctorProfile, NewAccount, NewAdmin,
    PatientProfile, PharmacistProfile, PortalError, ProfileId, ProfileRecord, Result, Role,
    StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    last_tag_id: i64,
    last_admin_id: i64,
    last_patient_id: i64,
    last_pharmacist_id: i64,
    last_doctor_id: i64,
    tags: BTreeMap<AccountTagId, AccountTag>,
    admins: BTreeMap<ProfileId, AdminProfile>,
    patients: BTreeMap<ProfileId, PatientProfile>,
    pharmacists: BTreeMap<ProfileId, PharmacistProfile>,
    doctors: BTreeMap<ProfileId, DoctorProfile>,
}

fn violation(constraint: &str) -> PortalError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
    .into()
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl Tables {
    fn email_taken(&self, role: Role, email: &str, exclude: Option<ProfileId>) -> bool {
        let other = |id: &ProfileId| Some(*id) != exclude;
        match role {
            Role::Admin => self
                .admins
                .iter()
                .any(|(id, a)| other(id) && a.email == email),
            Role::Patient => self
                .patients
                .iter()
                .any(|(id, p)| other(id) && p.email.as_deref() == Some(email)),
            Role::Pharmacist => self
                .pharmacists
                .iter()
                .any(|(id, p)| other(id) && p.email == email),
            Role::Doctor => self
                .doctors
                .iter()
                .any(|(id, d)| other(id) && d.email == email),
        }
    }

    fn license_taken(&self, role: Role, license: &str, exclude: Option<ProfileId>) -> bool {
        let other = |id: &ProfileId| Some(*id) != exclude;
        match role {
            Role::Pharmacist => self
                .pharmacists
                .iter()
                .any(|(id, p)| other(id) && p.license_number == license),
            Role::Doctor => self
                .doctors
                .iter()
                .any(|(id, d)| other(id) && d.license_number == license),
            Role::Admin | Role::Patient => false,
        }
    }

    /// Checks the unique constraints `record` would be written under
    fn check_unique(&self, record: &ProfileRecord) -> Result<()> {
        let role = record.role();
        let id = Some(record.id());
        if let Some(email) = record.email() {
            if self.email_taken(role, email, id) {
                return Err(violation(match role {
                    Role::Admin => constraints::ADMINS_EMAIL,
                    Role::Patient => constraints::PATIENTS_EMAIL,
                    Role::Pharmacist => constraints::PHARMACISTS_EMAIL,
                    Role::Doctor => constraints::DOCTORS_EMAIL,
                }));
            }
        }
        let license = match record {
            ProfileRecord::Pharmacist(p) => Some((&p.license_number, constraints::PHARMACISTS_LICENSE)),
            ProfileRecord::Doctor(d) => Some((&d.license_number, constraints::DOCTORS_LICENSE)),
            _ => None,
        };
        if let Some((license, constraint)) = license {
            if self.license_taken(role, license, id) {
                return Err(violation(constraint));
            }
        }
        Ok(())
    }

    fn get(&self, role: Role, id: ProfileId) -> Option<ProfileRecord> {
        match role {
            Role::Admin => self.admins.get(&id).cloned().map(ProfileRecord::Admin),
            Role::Patient => self.patients.get(&id).cloned().map(ProfileRecord::Patient),
            Role::Pharmacist => self
                .pharmacists
                .get(&id)
                .cloned()
                .map(ProfileRecord::Pharmacist),
            Role::Doctor => self.doctors.get(&id).cloned().map(ProfileRecord::Doctor),
        }
    }

    fn contains(&self, role: Role, id: ProfileId) -> bool {
        match role {
            Role::Admin => self.admins.contains_key(&id),
            Role::Patient => self.patients.contains_key(&id),
            Role::Pharmacist => self.pharmacists.contains_key(&id),
            Role::Doctor => self.doctors.contains_key(&id),
        }
    }

    fn put(&mut self, record: ProfileRecord) {
        match record {
            ProfileRecord::Admin(a) => {
                self.admins.insert(a.id, a);
            }
            ProfileRecord::Patient(p) => {
                self.patients.insert(p.id, p);
            }
            ProfileRecord::Pharmacist(p) => {
                self.pharmacists.insert(p.id, p);
            }
            ProfileRecord::Doctor(d) => {
                self.doctors.insert(d.id, d);
            }
        }
    }

    /// Removes a tag and every profile linked to it
    fn delete_tag_cascade(&mut self, tag: AccountTagId) {
        self.tags.remove(&tag);
        self.patients.retain(|_, p| p.account_tag != Some(tag));
        self.pharmacists.retain(|_, p| p.account_tag != Some(tag));
        self.doctors.retain(|_, d| d.account_tag != Some(tag));
    }
}

/// In-memory [`PortalStore`] for development and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile row exactly as given, bypassing tag creation
    ///
    /// Used to seed legacy rows (no account tag, raw passwords) in tests.
    pub async fn insert_raw(&self, record: ProfileRecord) -> Result<ProfileRecord> {
        let mut tables = self.tables.write().await;
        tables.check_unique(&record)?;
        let counter = match record.role() {
            Role::Admin => &mut tables.last_admin_id,
            Role::Patient => &mut tables.last_patient_id,
            Role::Pharmacist => &mut tables.last_pharmacist_id,
            Role::Doctor => &mut tables.last_doctor_id,
        };
        *counter = (*counter).max(record.id().value());
        tables.put(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl PortalStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn find_by_email(&self, role: Role, email: &str) -> Result<Vec<ProfileRecord>> {
        let tables = self.tables.read().await;
        let records = match role {
            Role::Admin => tables
                .admins
                .values()
                .filter(|a| a.email == email)
                .cloned()
                .map(ProfileRecord::Admin)
                .collect(),
            Role::Patient => tables
                .patients
                .values()
                .filter(|p| p.email.as_deref() == Some(email))
                .cloned()
                .map(ProfileRecord::Patient)
                .collect(),
            Role::Pharmacist => tables
                .pharmacists
                .values()
                .filter(|p| p.email == email)
                .cloned()
                .map(ProfileRecord::Pharmacist)
                .collect(),
            Role::Doctor => tables
                .doctors
                .values()
                .filter(|d| d.email == email)
                .cloned()
                .map(ProfileRecord::Doctor)
                .collect(),
        };
        Ok(records)
    }

    async fn load_profile(&self, role: Role, id: ProfileId) -> Result<Option<ProfileRecord>> {
        Ok(self.tables.read().await.get(role, id))
    }

    async fn email_taken(
        &self,
        role: Role,
        email: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool> {
        Ok(self.tables.read().await.email_taken(role, email, exclude))
    }

    async fn license_taken(
        &self,
        role: Role,
        license_number: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .license_taken(role, license_number, exclude))
    }

    async fn create_account(&self, account: NewAccount) -> Result<ProfileRecord> {
        let mut tables = self.tables.write().await;
        let tag_role = account.account_role();

        // Reserve ids without committing them until every check has passed.
        let tag_id = AccountTagId::new(tables.last_tag_id + 1);
        let today = Utc::now().date_naive();
        let record = match account {
            NewAccount::Patient(p) => ProfileRecord::Patient(PatientProfile {
                id: ProfileId::new(tables.last_patient_id + 1),
                account_tag: Some(tag_id),
                first_name: p.first_name,
                last_name: p.last_name,
                password: p.password,
                gender: Some(p.gender),
                blood_group: None,
                date_of_birth: None,
                phone_number: None,
                height: None,
                weight: None,
                email: Some(p.email),
                address: None,
            }),
            NewAccount::Pharmacist(p) => ProfileRecord::Pharmacist(PharmacistProfile {
                id: ProfileId::new(tables.last_pharmacist_id + 1),
                account_tag: Some(tag_id),
                first_name: p.first_name,
                last_name: p.last_name,
                password: p.password,
                gender: p.gender,
                license_number: p.license_number,
                phone_number: p.phone_number,
                email: p.email,
                address: p.address,
                registration_date: today,
            }),
            NewAccount::Doctor(d) => ProfileRecord::Doctor(DoctorProfile {
                id: ProfileId::new(tables.last_doctor_id + 1),
                account_tag: Some(tag_id),
                first_name: d.first_name,
                last_name: d.last_name,
                password: d.password,
                gender: d.gender,
                email: d.email,
                phone_number: d.phone_number,
                license_number: d.license_number,
                description: d.description,
                profile_picture: d.profile_picture,
                current_hospital: d.current_hospital,
                address: d.address,
                registration_date: today,
            }),
        };

        tables.check_unique(&record)?;

        next(&mut tables.last_tag_id);
        tables.tags.insert(
            tag_id,
            AccountTag {
                id: tag_id,
                role: tag_role,
            },
        );
        match record.role() {
            Role::Patient => next(&mut tables.last_patient_id),
            Role::Pharmacist => next(&mut tables.last_pharmacist_id),
            Role::Doctor => next(&mut tables.last_doctor_id),
            Role::Admin => next(&mut tables.last_admin_id),
        };
        tables.put(record.clone());
        Ok(record)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminProfile> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(Role::Admin, &admin.email, None) {
            return Err(violation(constraints::ADMINS_EMAIL));
        }
        let id = ProfileId::new(next(&mut tables.last_admin_id));
        let profile = AdminProfile {
            id,
            email: admin.email,
            password: admin.password,
        };
        tables.admins.insert(id, profile.clone());
        Ok(profile)
    }

    async fn save_profile(&self, record: &ProfileRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.contains(record.role(), record.id()) {
            return Err(PortalError::NotFound(format!(
                "{} {}",
                record.role(),
                record.id()
            )));
        }
        tables.check_unique(record)?;

        // Registration date and tag link are fixed at creation.
        let mut updated = record.clone();
        if let Some(existing) = tables.get(record.role(), record.id()) {
            match (&mut updated, existing) {
                (ProfileRecord::Pharmacist(new), ProfileRecord::Pharmacist(old)) => {
                    new.registration_date = old.registration_date;
                    new.account_tag = old.account_tag;
                }
                (ProfileRecord::Doctor(new), ProfileRecord::Doctor(old)) => {
                    new.registration_date = old.registration_date;
                    new.account_tag = old.account_tag;
                }
                (ProfileRecord::Patient(new), ProfileRecord::Patient(old)) => {
                    new.account_tag = old.account_tag;
                }
                _ => {}
            }
        }
        tables.put(updated);
        Ok(())
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorProfile>> {
        Ok(self.tables.read().await.doctors.values().cloned().collect())
    }

    async fn delete_doctor(&self, id: ProfileId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(doctor) = tables.doctors.get(&id) else {
            return Ok(false);
        };
        match doctor.account_tag {
            Some(tag) if tables.tags.contains_key(&tag) => tables.delete_tag_cascade(tag),
            _ => {
                tables.doctors.remove(&id);
            }
        }
        Ok(true)
    }

    async fn get_account_tag(&self, id: AccountTagId) -> Result<Option<AccountTag>> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn count_profiles(&self, role: Role) -> Result<u64> {
        let tables = self.tables.read().await;
        let count = match role {
            Role::Admin => tables.admins.len(),
            Role::Patient => tables.patients.len(),
            Role::Pharmacist => tables.pharmacists.len(),
            Role::Doctor => tables.doctors.len(),
        };
        Ok(count as u64)
    }

    async fn count_account_tags(&self) -> Result<u64> {
        Ok(self.tables.read().await.tags.len() as u64)
    }
}
