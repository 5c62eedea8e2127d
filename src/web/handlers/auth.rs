//! Login, logout and registration

use crate::core::auth::Resolution;
use crate::core::forms::FormFields;
use crate::domain::{PortalError, ProfileId, Role};
use crate::web::error::WebResult;
use crate::web::render::{form_context, FormValues};
use crate::web::session::SessionToken;
use crate::web::state::SharedState;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use tera::Context;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const REGISTER_FIELDS: &[&str] = &[
    "role",
    "email",
    "first_name",
    "last_name",
    "gender",
    "license_number",
    "phone_number",
    "address",
];

pub async fn login_page(State(state): State<SharedState>) -> WebResult<Response> {
    Ok(state
        .renderer
        .render("login.html", &Context::new())?
        .into_response())
}

/// Resolves the credentials and binds the browser to the matched role
///
/// Email and password are used exactly as submitted.
pub async fn login_submit(
    State(state): State<SharedState>,
    token: SessionToken,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    let email = fields.raw("email").unwrap_or_default();
    let password = fields.raw("password").unwrap_or_default();

    match state.resolver.resolve(email, password).await? {
        Some(Resolution { role, record }) => {
            crate::log_login_attempt!(email, Some((role, record.id())));
            let token = state
                .sessions
                .establish(token.as_deref(), role, record.id())
                .await;
            Ok((
                [(SET_COOKIE, state.cookies.issue(&token))],
                Redirect::to(role.dashboard_path()),
            )
                .into_response())
        }
        None => {
            crate::log_login_attempt!(email, None::<(Role, ProfileId)>);
            let mut context = Context::new();
            context.insert("error", INVALID_CREDENTIALS);
            context.insert("email", email);
            Ok(state
                .renderer
                .render("login.html", &context)?
                .into_response())
        }
    }
}

/// Clears every slot of the session and drops the cookie
pub async fn logout(State(state): State<SharedState>, token: SessionToken) -> Response {
    if let Some(token) = token.as_deref() {
        if state.sessions.teardown(token).await {
            tracing::info!("Session closed");
        }
    }
    ([(SET_COOKIE, state.cookies.expire())], Redirect::to("/")).into_response()
}

pub async fn register_page(State(state): State<SharedState>) -> WebResult<Response> {
    let mut values = FormValues::blank(REGISTER_FIELDS);
    values.set("role", Role::Patient.as_str());
    let context = form_context(&values, None);
    Ok(state
        .renderer
        .render("register.html", &context)?
        .into_response())
}

pub async fn register_submit(
    State(state): State<SharedState>,
    Form(fields): Form<FormFields>,
) -> WebResult<Response> {
    let role = fields.text("role").unwrap_or_default();
    match state.registration.register(role, &fields).await {
        Ok(_) => Ok(Redirect::to("/login/").into_response()),
        Err(PortalError::Validation(errors)) => {
            let values = FormValues::submitted(REGISTER_FIELDS, &fields);
            let context = form_context(&values, Some(&errors));
            Ok(state
                .renderer
                .render("register.html", &context)?
                .into_response())
        }
        Err(other) => Err(other.into()),
    }
}
