//! Own-profile pages for every role
//!
//! GET shows the form filled from the stored row. POST validates, saves and
//! re-renders with either a success message or the field errors.

use super::display_name;
use crate::core::forms::FormFields;
use crate::core::profile::PROFILE_UPDATED;
use crate::domain::{PortalError, ProfileRecord, Role, ValidationErrors};
use crate::web::error::{WebError, WebResult};
use crate::web::render::{form_context, FormValues};
use crate::web::session::{current_profile, SessionToken};
use crate::web::state::SharedState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;

pub const PATIENT_FORM_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "gender",
    "phone_number",
    "address",
    "date_of_birth",
    "blood_group",
    "height",
    "weight",
];

pub const PHARMACIST_FORM_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "gender",
    "email",
    "license_number",
    "phone_number",
    "address",
];

pub const DOCTOR_OWN_FIELDS: &[&str] = &[
    "phone_number",
    "description",
    "current_hospital",
    "address",
    "profile_picture",
];

pub const ADMIN_FORM_FIELDS: &[&str] = &["email"];

fn form_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => ADMIN_FORM_FIELDS,
        Role::Patient => PATIENT_FORM_FIELDS,
        Role::Pharmacist => PHARMACIST_FORM_FIELDS,
        Role::Doctor => DOCTOR_OWN_FIELDS,
    }
}

fn template(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin/profile.html",
        Role::Patient => "patient/profile.html",
        Role::Pharmacist => "pharmacist/profile.html",
        Role::Doctor => "doctor/profile.html",
    }
}

fn render_profile(
    state: &SharedState,
    record: &ProfileRecord,
    values: &FormValues,
    errors: Option<&ValidationErrors>,
    message: Option<&str>,
) -> WebResult<Response> {
    let mut context = form_context(values, errors);
    context.insert("user", record);
    context.insert("full_name", &display_name(record));
    if let Some(message) = message {
        context.insert("message", message);
    }
    Ok(state
        .renderer
        .render(template(record.role()), &context)?
        .into_response())
}

async fn show(state: &SharedState, token: &SessionToken, role: Role) -> WebResult<Response> {
    let record = current_profile(state, token, role).await?;
    let values = FormValues::from_record(&record, form_fields(role));
    render_profile(state, &record, &values, None, None)
}

async fn submit(
    state: &SharedState,
    token: &SessionToken,
    role: Role,
    fields: &FormFields,
) -> WebResult<Response> {
    let record = current_profile(state, token, role).await?;
    match state.profiles.update(record.clone(), fields).await {
        Ok(updated) => {
            let values = FormValues::from_record(&updated, form_fields(role));
            render_profile(state, &updated, &values, None, Some(PROFILE_UPDATED))
        }
        Err(PortalError::Validation(errors)) => {
            let values = FormValues::submitted(form_fields(role), fields);
            render_profile(state, &record, &values, Some(&errors), None)
        }
        Err(other) => Err(save_failure(other)),
    }
}

/// A record deleted between the session lookup and the save ends the session view
fn save_failure(err: PortalError) -> WebError {
    match err {
        PortalError::NotFound(detail) => {
            tracing::debug!(detail = %detail, "Profile vanished before save");
            WebError::LoginRequired
        }
        other => other.into(),
    }
}

pub async fn patient_profile(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    show(&state, &token, Role::Patient).await
}

pub async fn patient_profile_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    submit(&state, &token, Role::Patient, &fields).await
}

pub async fn pharmacist_profile(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    show(&state, &token, Role::Pharmacist).await
}

pub async fn pharmacist_profile_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    submit(&state, &token, Role::Pharmacist, &fields).await
}

pub async fn doctor_profile(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    show(&state, &token, Role::Doctor).await
}

pub async fn doctor_profile_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    submit(&state, &token, Role::Doctor, &fields).await
}

pub async fn admin_profile(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    show(&state, &token, Role::Admin).await
}

pub async fn admin_profile_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    submit(&state, &token, Role::Admin, &fields).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::PortalStore;
    use crate::adapters::memory::InMemoryStore;
    use crate::config::PasswordStorage;
    use crate::core::auth::PasswordHasher;
    use crate::core::profile::ProfileUpdater;
    use crate::domain::{Gender, NewAccount, NewPatient};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_profile_deleted_before_save_requires_login() {
        let hasher = PasswordHasher::new(PasswordStorage::Plaintext, 1000);
        let record = InMemoryStore::new()
            .create_account(NewAccount::Patient(NewPatient {
                email: "a@x.com".to_string(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                gender: Gender::Female,
                password: "longenough1".to_string(),
            }))
            .await
            .unwrap();

        // the updater's store never held the row, as after a concurrent delete
        let updater = ProfileUpdater::new(Arc::new(InMemoryStore::new()), hasher);
        let fields = FormFields::new()
            .with("first_name", "Ann")
            .with("last_name", "Lee")
            .with("gender", "female")
            .with("height", "170")
            .with("weight", "60");
        let err = updater.update(record, &fields).await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
        assert!(matches!(save_failure(err), WebError::LoginRequired));
    }

    #[test]
    fn test_other_save_failures_stay_internal() {
        let err = PortalError::Other("boom".to_string());
        assert!(matches!(save_failure(err), WebError::Internal(_)));
    }
}
