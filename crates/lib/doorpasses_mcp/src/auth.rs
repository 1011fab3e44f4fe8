//! MCP bearer token authentication middleware.
//!
//! Validates `Authorization: Bearer <token>` headers against the MCP
//! access-token store and attaches the resulting context to the request.

use axum::{
    extract::State,
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use doorpasses_core::oauth::issuer::validate_access_token;

/// Authenticated scope of an MCP request, derived from the access token.
///
/// Inserted into request extensions by [`mcp_auth_middleware`] and passed
/// opaquely into tool handlers.
#[derive(Debug, Clone)]
pub struct McpContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub authorization_id: Uuid,
    pub client_name: String,
}

/// 401 response carrying the `WWW-Authenticate: Bearer` challenge.
fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, [(WWW_AUTHENTICATE, "Bearer")]).into_response()
}

/// Axum middleware: validates MCP bearer tokens.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the
/// token hash, expiry, and parent-authorization state. Returns 401 with a
/// Bearer challenge if the token is missing, malformed, expired, or
/// revoked.
pub async fn mcp_auth_middleware(
    State(pool): State<PgPool>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request.headers().get(AUTHORIZATION);

    let token = match auth_header {
        Some(header) => {
            let header_str = header.to_str().unwrap_or("");
            match header_str.strip_prefix("Bearer ") {
                Some(t) => t.to_string(),
                None => {
                    debug!("MCP auth: missing Bearer prefix");
                    return Err(unauthorized());
                }
            }
        }
        None => {
            debug!("MCP auth: no Authorization header");
            return Err(unauthorized());
        }
    };

    match validate_access_token(&pool, &token).await {
        Ok(Some(authorization)) => {
            request.extensions_mut().insert(McpContext {
                user_id: authorization.user_id,
                organization_id: authorization.organization_id,
                authorization_id: authorization.id,
                client_name: authorization.client_name,
            });
            Ok(next.run(request).await)
        }
        Ok(None) => {
            debug!("MCP auth: token not found or revoked/expired");
            Err(unauthorized())
        }
        Err(e) => {
            debug!("MCP auth: database error: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}
