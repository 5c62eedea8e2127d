//! Session cookie handling
//!
//! The cookie carries only the opaque token. Every protected page re-reads
//! its role slot and re-fetches the record, so a deleted record behaves like
//! a missing slot.

use super::error::WebError;
use super::state::SharedState;
use crate::config::SessionConfig;
use crate::domain::{ProfileRecord, Role};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

/// Cookie attributes taken from `[session]`
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_seconds: u64,
    pub secure: bool,
}

impl CookieSettings {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age_seconds: config.max_age_seconds,
            secure: config.secure_cookie,
        }
    }

    fn attributes(&self, max_age: u64) -> String {
        let mut attributes = format!("HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
        if self.secure {
            attributes.push_str("; Secure");
        }
        attributes
    }

    /// `Set-Cookie` value binding the browser to `token`
    pub fn issue(&self, token: &str) -> String {
        format!("{}={}; {}", self.name, token, self.attributes(self.max_age_seconds))
    }

    /// `Set-Cookie` value that removes the cookie
    pub fn expire(&self) -> String {
        format!("{}=; {}", self.name, self.attributes(0))
    }

    /// Token from the request's `Cookie` headers
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }
}

/// Session token presented by the browser, if any
#[derive(Debug, Clone)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<SharedState> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(state.cookies.read(&parts.headers)))
    }
}

/// Re-derives the signed-in `role` record from the session
///
/// # Errors
///
/// `WebError::LoginRequired` for a missing slot or a stale id; store
/// failures become `WebError::Internal`.
pub async fn current_profile(
    state: &SharedState,
    token: &SessionToken,
    role: Role,
) -> Result<ProfileRecord, WebError> {
    let Some(token) = token.as_deref() else {
        return Err(WebError::LoginRequired);
    };
    let Some(id) = state.sessions.state(token).await.get(role) else {
        return Err(WebError::LoginRequired);
    };
    match state.store.load_profile(role, id).await? {
        Some(record) => Ok(record),
        None => {
            tracing::debug!(role = %role, id = %id, "Session points at a missing record");
            Err(WebError::LoginRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            name: "mediwise_session".to_string(),
            max_age_seconds: 60,
            secure,
        }
    }

    #[test]
    fn test_issue_and_expire() {
        assert_eq!(
            settings(false).issue("abc"),
            "mediwise_session=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=60"
        );
        assert_eq!(
            settings(true).expire(),
            "mediwise_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Secure"
        );
    }

    #[test]
    fn test_read_finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; mediwise_session=tok123"));
        assert_eq!(settings(false).read(&headers).as_deref(), Some("tok123"));

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("mediwise_session="));
        assert_eq!(settings(false).read(&headers), None);
        assert_eq!(settings(false).read(&HeaderMap::new()), None);
    }
}
