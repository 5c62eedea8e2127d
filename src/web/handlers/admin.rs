//! Admin dashboard and doctor management
//!
//! Every handler here first re-fetches the admin behind the `admin_id` slot.

use crate::core::admin::doctors::{DOCTOR_ADDED, DOCTOR_DELETED, DOCTOR_NOT_FOUND, DOCTOR_UPDATED};
use crate::core::forms::FormFields;
use crate::domain::{PortalError, ProfileId, Role, ValidationErrors};
use crate::web::error::WebResult;
use crate::web::render::{form_context, FormValues};
use crate::web::session::{current_profile, SessionToken};
use crate::web::state::SharedState;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tera::Context;

pub const UNKNOWN_ACTION: &str = "Unknown action.";

pub const DOCTOR_FORM_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "gender",
    "phone_number",
    "license_number",
    "description",
    "current_hospital",
    "address",
    "profile_picture",
];

#[derive(Debug, Serialize)]
struct Counts {
    patients: u64,
    pharmacists: u64,
    doctors: u64,
}

pub async fn dashboard(State(state): State<SharedState>, token: SessionToken) -> WebResult<Response> {
    let admin = current_profile(&state, &token, Role::Admin).await?;
    let counts = Counts {
        patients: state.store.count_profiles(Role::Patient).await?,
        pharmacists: state.store.count_profiles(Role::Pharmacist).await?,
        doctors: state.store.count_profiles(Role::Doctor).await?,
    };

    let mut context = Context::new();
    context.insert("user", &admin);
    context.insert("counts", &counts);
    Ok(state
        .renderer
        .render("admin/dashboard.html", &context)?
        .into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DoctorsQuery {
    pub edit: Option<i64>,
}

/// What the doctor page shows besides the list
#[derive(Default)]
struct DoctorsView<'a> {
    values: Option<FormValues>,
    errors: Option<&'a ValidationErrors>,
    editing: Option<ProfileId>,
    message: Option<&'a str>,
    error: Option<&'a str>,
}

async fn render_doctors(state: &SharedState, view: DoctorsView<'_>) -> WebResult<Response> {
    let doctors = state.doctors.list().await?;
    let values = view
        .values
        .unwrap_or_else(|| FormValues::blank(DOCTOR_FORM_FIELDS));

    let mut context = form_context(&values, view.errors);
    context.insert("doctors", &doctors);
    context.insert("editing", &view.editing);
    if let Some(message) = view.message {
        context.insert("message", message);
    }
    if let Some(error) = view.error {
        context.insert("error", error);
    }
    Ok(state
        .renderer
        .render("admin/doctors.html", &context)?
        .into_response())
}

/// Doctor list plus the add form, or the edit form with `?edit=<id>`
pub async fn doctors_page(
    State(state): State<SharedState>,
    token: SessionToken,
    Query(query): Query<DoctorsQuery>,
) -> WebResult<Response> {
    current_profile(&state, &token, Role::Admin).await?;

    let Some(id) = query.edit.map(ProfileId::new) else {
        return render_doctors(&state, DoctorsView::default()).await;
    };
    match state.store.load_profile(Role::Doctor, id).await? {
        Some(doctor) => {
            let values = FormValues::from_record(&doctor, DOCTOR_FORM_FIELDS);
            let view = DoctorsView {
                values: Some(values),
                editing: Some(id),
                ..DoctorsView::default()
            };
            render_doctors(&state, view).await
        }
        None => {
            let view = DoctorsView {
                error: Some(DOCTOR_NOT_FOUND),
                ..DoctorsView::default()
            };
            render_doctors(&state, view).await
        }
    }
}

fn doctor_id(fields: &FormFields) -> Option<ProfileId> {
    fields
        .text("doctor_id")
        .and_then(|id| id.parse::<i64>().ok())
        .map(ProfileId::new)
}

/// Dispatches on the `action` field: add, edit or delete
pub async fn doctors_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    let admin = current_profile(&state, &token, Role::Admin).await?;
    let admin_email = admin.email().unwrap_or_default().to_string();
    let action = fields.text("action").unwrap_or_default();

    let (outcome, editing) = match action {
        "add" => (state.doctors.add(&fields).await.map(|_| DOCTOR_ADDED), None),
        "edit" => match doctor_id(&fields) {
            Some(id) => (
                state.doctors.edit(id, &fields).await.map(|_| DOCTOR_UPDATED),
                Some(id),
            ),
            None => (Err(PortalError::NotFound(DOCTOR_NOT_FOUND.to_string())), None),
        },
        "delete" => match doctor_id(&fields) {
            Some(id) => (state.doctors.delete(id).await.map(|_| DOCTOR_DELETED), None),
            None => (Err(PortalError::NotFound(DOCTOR_NOT_FOUND.to_string())), None),
        },
        _ => {
            tracing::debug!(action, "Unknown doctor action");
            let view = DoctorsView {
                error: Some(UNKNOWN_ACTION),
                ..DoctorsView::default()
            };
            return render_doctors(&state, view).await;
        }
    };

    match outcome {
        Ok(message) => {
            tracing::info!(admin = %admin_email, action, "Doctor management action applied");
            let view = DoctorsView {
                message: Some(message),
                ..DoctorsView::default()
            };
            render_doctors(&state, view).await
        }
        Err(PortalError::Validation(errors)) => {
            let view = DoctorsView {
                values: Some(FormValues::submitted(DOCTOR_FORM_FIELDS, &fields)),
                errors: Some(&errors),
                editing,
                ..DoctorsView::default()
            };
            render_doctors(&state, view).await
        }
        Err(PortalError::NotFound(_)) => {
            let view = DoctorsView {
                error: Some(DOCTOR_NOT_FOUND),
                ..DoctorsView::default()
            };
            render_doctors(&state, view).await
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_id_parsing() {
        assert_eq!(
            doctor_id(&FormFields::new().with("doctor_id", " 12 ")),
            Some(ProfileId::new(12))
        );
        assert_eq!(doctor_id(&FormFields::new().with("doctor_id", "abc")), None);
        assert_eq!(doctor_id(&FormFields::new()), None);
    }

    #[test]
    fn test_doctor_form_values_come_from_record() {
        use crate::domain::{DoctorProfile, Gender, ProfileRecord};
        use chrono::NaiveDate;

        let doctor = ProfileRecord::Doctor(DoctorProfile {
            id: ProfileId::new(4),
            account_tag: None,
            first_name: "James".to_string(),
            last_name: "Wilson".to_string(),
            password: "hash".to_string(),
            gender: Gender::Male,
            email: "wilson@x.com".to_string(),
            phone_number: None,
            license_number: "MD-2".to_string(),
            description: None,
            profile_picture: None,
            current_hospital: None,
            address: None,
            registration_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        });
        let values = serde_json::to_value(FormValues::from_record(&doctor, DOCTOR_FORM_FIELDS)).unwrap();
        assert_eq!(values["license_number"], "MD-2");
        assert_eq!(values["gender"], "male");
        assert_eq!(values["description"], "");
        assert!(values.get("password").is_none());
    }
}
