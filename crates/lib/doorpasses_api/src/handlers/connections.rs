//! Connection management request handlers.
//!
//! "Connections" are the user-facing view of MCP authorizations: which
//! clients this user has approved, per organization.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doorpasses_core::models::oauth::Authorization;
use doorpasses_core::oauth::authorizations;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::session::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct ListConnectionsQuery {
    pub organization_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionListResponse {
    pub connections: Vec<Authorization>,
}

/// `GET /api/connections` — list the caller's authorized clients.
pub async fn list_connections_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListConnectionsQuery>,
) -> AppResult<Json<ConnectionListResponse>> {
    let connections =
        authorizations::list(&state.pool, user.user_id, query.organization_id).await?;
    Ok(Json(ConnectionListResponse { connections }))
}

/// `DELETE /api/connections/{id}` — revoke an authorization.
///
/// Revocation is soft; tokens tied to the authorization stop validating
/// immediately. Foreign ids answer 404 rather than 403 so callers cannot
/// probe for other users' authorization ids.
pub async fn revoke_connection_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(connection_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let authorization = authorizations::find(&state.pool, connection_id)
        .await?
        .filter(|a| a.user_id == user.user_id)
        .ok_or_else(|| AppError::NotFound("Connection not found".into()))?;

    authorizations::revoke(&state.pool, authorization.id).await?;
    Ok(Json(serde_json::json!({"success": true})))
}
