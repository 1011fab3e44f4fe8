//! Durable client authorizations (user consent records).
//!
//! One row per user+org+client records that the user approved the
//! client's access to an organization. Revocation deactivates the row
//! rather than deleting it, so the audit trail survives and dependent
//! tokens fail validation immediately.

use sqlx::PgPool;
use tracing::debug;

use super::OAuthError;
use crate::models::oauth::Authorization;
use crate::uuid::uuidv7;

/// Reuse the active authorization for (user, org, client) or create one.
///
/// Uniqueness is not hard-enforced; a lost race can leave duplicates,
/// which the newest-first lookup tolerates.
pub async fn get_or_create(
    pool: &PgPool,
    user_id: uuid::Uuid,
    organization_id: uuid::Uuid,
    client_name: &str,
) -> Result<Authorization, OAuthError> {
    let existing = sqlx::query_as::<_, Authorization>(
        "SELECT id, user_id, organization_id, client_name, is_active, created_at, last_used_at \
         FROM mcp_authorizations \
         WHERE user_id = $1 AND organization_id = $2 AND client_name = $3 AND is_active \
         ORDER BY created_at DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .bind(organization_id)
    .bind(client_name)
    .fetch_optional(pool)
    .await?;

    if let Some(authorization) = existing {
        return Ok(authorization);
    }

    let created = sqlx::query_as::<_, Authorization>(
        "INSERT INTO mcp_authorizations (id, user_id, organization_id, client_name) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, organization_id, client_name, is_active, created_at, last_used_at",
    )
    .bind(uuidv7())
    .bind(user_id)
    .bind(organization_id)
    .bind(client_name)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Find an authorization by id.
pub async fn find(
    pool: &PgPool,
    authorization_id: uuid::Uuid,
) -> Result<Option<Authorization>, OAuthError> {
    let authorization = sqlx::query_as::<_, Authorization>(
        "SELECT id, user_id, organization_id, client_name, is_active, created_at, last_used_at \
         FROM mcp_authorizations \
         WHERE id = $1",
    )
    .bind(authorization_id)
    .fetch_optional(pool)
    .await?;

    Ok(authorization)
}

/// List authorizations owned by `user_id`, newest first, optionally
/// narrowed to one organization. Never returns another user's rows.
pub async fn list(
    pool: &PgPool,
    user_id: uuid::Uuid,
    organization_id: Option<uuid::Uuid>,
) -> Result<Vec<Authorization>, OAuthError> {
    let authorizations = sqlx::query_as::<_, Authorization>(
        "SELECT id, user_id, organization_id, client_name, is_active, created_at, last_used_at \
         FROM mcp_authorizations \
         WHERE user_id = $1 AND ($2::uuid IS NULL OR organization_id = $2) \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(organization_id)
    .fetch_all(pool)
    .await?;

    Ok(authorizations)
}

/// Deactivate an authorization. Dependent tokens fail validation from the
/// next request on; token rows are left for the cleanup sweep.
pub async fn revoke(pool: &PgPool, authorization_id: uuid::Uuid) -> Result<(), OAuthError> {
    sqlx::query("UPDATE mcp_authorizations SET is_active = false WHERE id = $1")
        .bind(authorization_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Best-effort `last_used_at` touch. Failures are logged and swallowed —
/// this must never block or fail the request that triggered it.
pub async fn touch_last_used(pool: &PgPool, authorization_id: uuid::Uuid) {
    let result = sqlx::query("UPDATE mcp_authorizations SET last_used_at = now() WHERE id = $1")
        .bind(authorization_id)
        .execute(pool)
        .await;

    if let Err(e) = result {
        debug!(authorization_id = %authorization_id, error = %e, "last_used_at touch failed");
    }
}
