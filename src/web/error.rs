//! Handler errors and their HTML responses

use crate::domain::PortalError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

const SERVER_ERROR_PAGE: &str = include_str!("../../templates/static/500.html");
const NOT_FOUND_PAGE: &str = include_str!("../../templates/static/404.html");

/// Errors a handler can end with
///
/// Validation failures never reach this type; handlers re-render their form
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// No session slot for the role, or the slot points at a deleted record
    #[error("Login required")]
    LoginRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Store, template or other unexpected failure; details are logged, not shown
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::LoginRequired => Redirect::to("/login/").into_response(),
            WebError::NotFound(detail) => {
                tracing::debug!(detail = %detail, "Not found");
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
            }
            WebError::Internal(detail) => {
                tracing::error!(detail = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
        }
    }
}

impl From<PortalError> for WebError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::NotFound(detail) => WebError::NotFound(detail),
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<tera::Error> for WebError {
    fn from(err: tera::Error) -> Self {
        let mut detail = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        WebError::Internal(detail)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use axum::http::header::LOCATION;

    #[test]
    fn test_login_required_redirects_with_see_other() {
        let response = WebError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login/");
    }

    #[test]
    fn test_store_failure_is_opaque_500() {
        let err: WebError = PortalError::from(StoreError::QueryFailed("secret detail".into())).into();
        assert!(matches!(err, WebError::Internal(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!SERVER_ERROR_PAGE.contains("secret detail"));
    }

    #[test]
    fn test_portal_not_found_maps_to_404() {
        let err: WebError = PortalError::NotFound("doctor 9".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
