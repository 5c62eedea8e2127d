//! Route table

use super::error::WebError;
use super::handlers::{admin, auth, pages, profile};
use super::state::SharedState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the portal router over `state`
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/login/", get(auth::login_page).post(auth::login_submit))
        .route(
            "/register/",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/logout/", get(auth::logout))
        .route("/dashboard/", get(admin::dashboard))
        .route("/patient_dashboard/", get(pages::patient_dashboard))
        .route("/pharmacist/dashboard/", get(pages::pharmacist_dashboard))
        .route("/doctor/dashboard/", get(pages::doctor_dashboard))
        .route(
            "/patient/profile/",
            get(profile::patient_profile).post(profile::patient_profile_submit),
        )
        .route(
            "/update_profile/",
            get(profile::patient_profile).post(profile::patient_profile_submit),
        )
        .route(
            "/pharmacist_profile/",
            get(profile::pharmacist_profile).post(profile::pharmacist_profile_submit),
        )
        .route(
            "/doctor/profile/",
            get(profile::doctor_profile).post(profile::doctor_profile_submit),
        )
        .route(
            "/admin_profile/",
            get(profile::admin_profile).post(profile::admin_profile_submit),
        )
        .route(
            "/admin_doctors/",
            get(admin::doctors_page).post(admin::doctors_submit),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> WebError {
    WebError::NotFound("no such route".to_string())
}
