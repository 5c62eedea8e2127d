//! PostgreSQL adapter implementing [`PortalStore`]

use super::client::{map_pg_error, PostgreSQLClient};
use super::models::{
    account_tag_from_row, admin_from_row, doctor_from_row, record_from_row, table_for,
    ADMIN_COLUMNS, DOCTOR_COLUMNS, PATIENT_COLUMNS, PHARMACIST_COLUMNS,
};
use crate::adapters::database::traits::PortalStore;
use crate::domain::{
    AccountTag, AccountTagId, AdminProfile, DoctorProfile, NewAccount, NewAdmin, PortalError,
    ProfileId, ProfileRecord, Result, Role, StoreError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of the store trait
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn license_table(role: Role) -> Option<&'static str> {
    match role {
        Role::Pharmacist => Some("pharmacists"),
        Role::Doctor => Some("doctors"),
        Role::Admin | Role::Patient => None,
    }
}

fn tx_error(context: &str, err: tokio_postgres::Error) -> PortalError {
    StoreError::TransactionFailed(format!("{context}: {err}")).into()
}

#[async_trait]
impl PortalStore for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn find_by_email(&self, role: Role, email: &str) -> Result<Vec<ProfileRecord>> {
        let (table, columns) = table_for(role);
        let query = format!("SELECT {columns} FROM {table} WHERE email = $1 ORDER BY id");
        self.client
            .query(&query, &[&email])
            .await?
            .iter()
            .map(|row| record_from_row(role, row))
            .collect()
    }

    async fn load_profile(&self, role: Role, id: ProfileId) -> Result<Option<ProfileRecord>> {
        let (table, columns) = table_for(role);
        let query = format!("SELECT {columns} FROM {table} WHERE id = $1");
        self.client
            .query_opt(&query, &[&id.value()])
            .await?
            .map(|row| record_from_row(role, &row))
            .transpose()
    }

    async fn email_taken(
        &self,
        role: Role,
        email: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool> {
        let (table, _) = table_for(role);
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))"
        );
        let exclude = exclude.map(|id| id.value());
        let rows = self.client.query(&query, &[&email, &exclude]).await?;
        Ok(rows.first().map(|row| row.get::<_, bool>(0)).unwrap_or(false))
    }

    async fn license_taken(
        &self,
        role: Role,
        license_number: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool> {
        let Some(table) = license_table(role) else {
            return Ok(false);
        };
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE license_number = $1 AND ($2::BIGINT IS NULL OR id <> $2))"
        );
        let exclude = exclude.map(|id| id.value());
        let rows = self
            .client
            .query(&query, &[&license_number, &exclude])
            .await?;
        Ok(rows.first().map(|row| row.get::<_, bool>(0)).unwrap_or(false))
    }

    async fn create_account(&self, account: NewAccount) -> Result<ProfileRecord> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| tx_error("Failed to begin transaction", e))?;

        let tag_row = tx
            .query_one(
                "INSERT INTO account_tags (role) VALUES ($1) RETURNING id",
                &[&account.account_role().as_str()],
            )
            .await
            .map_err(|e| map_pg_error("Failed to insert account tag", e))?;
        let tag_id: i64 = tag_row.get(0);

        // Dropping `tx` on any early return rolls the tag back.
        let record = match &account {
            NewAccount::Patient(p) => {
                let query = format!(
                    "INSERT INTO patients (account_tag_id, first_name, last_name, password, gender, email) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PATIENT_COLUMNS}"
                );
                let row = tx
                    .query_one(
                        &query,
                        &[
                            &tag_id,
                            &p.first_name,
                            &p.last_name,
                            &p.password,
                            &p.gender.as_str(),
                            &p.email,
                        ],
                    )
                    .await
                    .map_err(|e| map_pg_error("Failed to insert patient", e))?;
                record_from_row(Role::Patient, &row)?
            }
            NewAccount::Pharmacist(p) => {
                let query = format!(
                    "INSERT INTO pharmacists (account_tag_id, first_name, last_name, password, gender, \
                     license_number, phone_number, email, address) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {PHARMACIST_COLUMNS}"
                );
                let row = tx
                    .query_one(
                        &query,
                        &[
                            &tag_id,
                            &p.first_name,
                            &p.last_name,
                            &p.password,
                            &p.gender.as_str(),
                            &p.license_number,
                            &p.phone_number,
                            &p.email,
                            &p.address,
                        ],
                    )
                    .await
                    .map_err(|e| map_pg_error("Failed to insert pharmacist", e))?;
                record_from_row(Role::Pharmacist, &row)?
            }
            NewAccount::Doctor(d) => {
                let query = format!(
                    "INSERT INTO doctors (account_tag_id, first_name, last_name, password, gender, email, \
                     phone_number, license_number, description, profile_picture, current_hospital, address) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {DOCTOR_COLUMNS}"
                );
                let row = tx
                    .query_one(
                        &query,
                        &[
                            &tag_id,
                            &d.first_name,
                            &d.last_name,
                            &d.password,
                            &d.gender.as_str(),
                            &d.email,
                            &d.phone_number,
                            &d.license_number,
                            &d.description,
                            &d.profile_picture,
                            &d.current_hospital,
                            &d.address,
                        ],
                    )
                    .await
                    .map_err(|e| map_pg_error("Failed to insert doctor", e))?;
                record_from_row(Role::Doctor, &row)?
            }
        };

        tx.commit()
            .await
            .map_err(|e| tx_error("Failed to commit account", e))?;

        tracing::debug!(
            role = %record.role(),
            profile_id = %record.id(),
            account_tag = tag_id,
            "Account created"
        );
        Ok(record)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminProfile> {
        let query = format!(
            "INSERT INTO admins (email, password) VALUES ($1, $2) RETURNING {ADMIN_COLUMNS}"
        );
        let rows = self
            .client
            .query(&query, &[&admin.email, &admin.password])
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| StoreError::QueryFailed("INSERT returned no row".to_string()))?;
        admin_from_row(row)
    }

    async fn save_profile(&self, record: &ProfileRecord) -> Result<()> {
        let updated = match record {
            ProfileRecord::Admin(a) => {
                self.client
                    .execute(
                        "UPDATE admins SET email = $1, password = $2 WHERE id = $3",
                        &[&a.email, &a.password, &a.id.value()],
                    )
                    .await?
            }
            ProfileRecord::Patient(p) => {
                self.client
                    .execute(
                        "UPDATE patients SET first_name = $1, last_name = $2, password = $3, \
                         gender = $4, blood_group = $5, date_of_birth = $6, phone_number = $7, \
                         height = $8, weight = $9, email = $10, address = $11 WHERE id = $12",
                        &[
                            &p.first_name,
                            &p.last_name,
                            &p.password,
                            &p.gender.map(|g| g.as_str()),
                            &p.blood_group.map(|b| b.as_str()),
                            &p.date_of_birth,
                            &p.phone_number,
                            &p.height,
                            &p.weight,
                            &p.email,
                            &p.address,
                            &p.id.value(),
                        ],
                    )
                    .await?
            }
            ProfileRecord::Pharmacist(p) => {
                self.client
                    .execute(
                        "UPDATE pharmacists SET first_name = $1, last_name = $2, password = $3, \
                         gender = $4, license_number = $5, phone_number = $6, email = $7, \
                         address = $8 WHERE id = $9",
                        &[
                            &p.first_name,
                            &p.last_name,
                            &p.password,
                            &p.gender.as_str(),
                            &p.license_number,
                            &p.phone_number,
                            &p.email,
                            &p.address,
                            &p.id.value(),
                        ],
                    )
                    .await?
            }
            ProfileRecord::Doctor(d) => {
                self.client
                    .execute(
                        "UPDATE doctors SET first_name = $1, last_name = $2, password = $3, \
                         gender = $4, email = $5, phone_number = $6, license_number = $7, \
                         description = $8, profile_picture = $9, current_hospital = $10, \
                         address = $11 WHERE id = $12",
                        &[
                            &d.first_name,
                            &d.last_name,
                            &d.password,
                            &d.gender.as_str(),
                            &d.email,
                            &d.phone_number,
                            &d.license_number,
                            &d.description,
                            &d.profile_picture,
                            &d.current_hospital,
                            &d.address,
                            &d.id.value(),
                        ],
                    )
                    .await?
            }
        };

        if updated == 0 {
            return Err(PortalError::NotFound(format!(
                "{} {}",
                record.role(),
                record.id()
            )));
        }
        Ok(())
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorProfile>> {
        let query = format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id");
        self.client
            .query(&query, &[])
            .await?
            .iter()
            .map(doctor_from_row)
            .collect()
    }

    async fn delete_doctor(&self, id: ProfileId) -> Result<bool> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| tx_error("Failed to begin transaction", e))?;

        let Some(row) = tx
            .query_opt(
                "SELECT account_tag_id FROM doctors WHERE id = $1 FOR UPDATE",
                &[&id.value()],
            )
            .await
            .map_err(|e| map_pg_error("Failed to load doctor", e))?
        else {
            return Ok(false);
        };
        let tag: Option<i64> = row.get(0);

        let removed_via_tag = match tag {
            Some(tag) => {
                tx.execute("DELETE FROM account_tags WHERE id = $1", &[&tag])
                    .await
                    .map_err(|e| map_pg_error("Failed to delete account tag", e))?
                    > 0
            }
            None => false,
        };
        if !removed_via_tag {
            tx.execute("DELETE FROM doctors WHERE id = $1", &[&id.value()])
                .await
                .map_err(|e| map_pg_error("Failed to delete doctor", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| tx_error("Failed to commit doctor deletion", e))?;
        Ok(true)
    }

    async fn get_account_tag(&self, id: AccountTagId) -> Result<Option<AccountTag>> {
        self.client
            .query_opt(
                "SELECT id, role FROM account_tags WHERE id = $1",
                &[&id.value()],
            )
            .await?
            .map(|row| account_tag_from_row(&row))
            .transpose()
    }

    async fn count_profiles(&self, role: Role) -> Result<u64> {
        let (table, _) = table_for(role);
        let query = format!("SELECT COUNT(*) FROM {table}");
        let rows = self.client.query(&query, &[]).await?;
        let count: i64 = rows.first().map(|row| row.get(0)).unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    async fn count_account_tags(&self) -> Result<u64> {
        let rows = self
            .client
            .query("SELECT COUNT(*) FROM account_tags", &[])
            .await?;
        let count: i64 = rows.first().map(|row| row.get(0)).unwrap_or(0);
        Ok(count.max(0) as u64)
    }
}
