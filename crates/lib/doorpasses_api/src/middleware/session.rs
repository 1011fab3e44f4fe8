//! Session middleware — resolves the platform session cookie.
//!
//! The OAuth authorization and connection-management endpoints act on
//! behalf of a logged-in DoorPasses user. Login itself happens elsewhere
//! in the platform; this middleware only resolves the cookie it left
//! behind.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use doorpasses_core::identity::resolve_session;

use crate::AppState;
use crate::error::AppError;

/// Name of the platform session cookie.
pub const SESSION_COOKIE: &str = "doorpasses_session";

/// Key used to store the resolved user in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    /// Whether the session came from an SSO login.
    pub sso: bool,
}

/// Axum middleware: resolves the session cookie and injects
/// [`CurrentUser`] into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing session cookie".into()))?;

    let session = resolve_session(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".into()))?;

    request.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        sso: session.sso,
    });

    Ok(next.run(request).await)
}
