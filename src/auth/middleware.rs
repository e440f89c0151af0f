use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use super::AdminGate;
use crate::constants::ADMIN_COOKIE;

/// Read the admin session token from the request cookies.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("cookie")
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix(ADMIN_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
            })
        })
}

/// A logged-in admin. Redirects to the login page otherwise.
#[derive(Debug, Clone)]
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AdminGate: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AdminGate::from_ref(state);

        match session_token(&parts.headers) {
            Some(token) if gate.is_valid(token) => Ok(RequireAdmin),
            _ => Err(Redirect::to("/admin/login").into_response()),
        }
    }
}
