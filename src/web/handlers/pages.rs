//! Landing page and role dashboards

use super::display_name;
use crate::core::profile::{is_incomplete, missing_fields, required_fields};
use crate::domain::Role;
use crate::web::error::WebResult;
use crate::web::session::{current_profile, SessionToken};
use crate::web::state::SharedState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tera::Context;

pub async fn index(State(state): State<SharedState>) -> WebResult<Response> {
    Ok(state
        .renderer
        .render("index.html", &Context::new())?
        .into_response())
}

/// Dashboard for a tagged role, flagging an incomplete profile
async fn role_dashboard(state: &SharedState, token: &SessionToken, role: Role) -> WebResult<Response> {
    let record = current_profile(state, token, role).await?;
    let required = required_fields(role);

    let mut context = Context::new();
    context.insert("role", role.as_str());
    context.insert("user", &record);
    context.insert("full_name", &display_name(&record));
    context.insert("profile_incomplete", &is_incomplete(&record, required));
    context.insert("missing_fields", &missing_fields(&record, required));
    context.insert("profile_path", role.profile_path());
    Ok(state
        .renderer
        .render("dashboard.html", &context)?
        .into_response())
}

pub async fn patient_dashboard(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    role_dashboard(&state, &token, Role::Patient).await
}

pub async fn pharmacist_dashboard(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    role_dashboard(&state, &token, Role::Pharmacist).await
}

pub async fn doctor_dashboard(
    State(state): State<SharedState>,
    token: SessionToken,
) -> WebResult<Response> {
    role_dashboard(&state, &token, Role::Doctor).await
}
