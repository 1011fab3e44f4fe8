//! Access/refresh token issuance, validation, and rotation.
//!
//! Tokens are minted in pairs bound to one authorization. Only SHA-256
//! hashes are persisted; the raw values leave this module exactly once,
//! inside the returned `TokenResponse`. Validation checks hash, expiry,
//! and the parent authorization's live `is_active` flag, so revocation
//! takes effect before tokens expire.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use super::OAuthError;
use super::authorizations;
use super::tokens::{generate_token_pair, hash_token};
use crate::models::oauth::{Authorization, TokenResponse};
use crate::uuid::uuidv7;

/// Access token lifetime (1 hour).
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Refresh token lifetime (30 days).
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// Mint a pair and persist its hashes on the given connection.
async fn insert_token_pair(
    conn: &mut PgConnection,
    authorization_id: uuid::Uuid,
) -> Result<TokenResponse, OAuthError> {
    let pair = generate_token_pair();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO mcp_access_tokens (id, authorization_id, token_hash, expires_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(uuidv7())
    .bind(authorization_id)
    .bind(hash_token(&pair.access_token))
    .bind(now + chrono::Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS))
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO mcp_refresh_tokens (id, authorization_id, token_hash, expires_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(uuidv7())
    .bind(authorization_id)
    .bind(hash_token(&pair.refresh_token))
    .bind(now + chrono::Duration::days(REFRESH_TOKEN_EXPIRY_DAYS))
    .execute(&mut *conn)
    .await?;

    Ok(TokenResponse {
        access_token: pair.access_token,
        refresh_token: Some(pair.refresh_token),
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_SECS,
    })
}

/// Mint and persist a fresh token pair for an authorization.
pub async fn issue_tokens(
    pool: &PgPool,
    authorization_id: uuid::Uuid,
) -> Result<TokenResponse, OAuthError> {
    let mut tx = pool.begin().await?;
    let response = insert_token_pair(&mut tx, authorization_id).await?;
    tx.commit().await?;

    debug!(authorization_id = %authorization_id, "Issued MCP token pair");
    Ok(response)
}

/// Validate a presented access token.
///
/// Returns the owning authorization when the hash is known, the token is
/// unexpired, and the authorization is still active. On success the
/// authorization's `last_used_at` is touched off the request path.
pub async fn validate_access_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Authorization>, OAuthError> {
    let token_hash = hash_token(token);

    let authorization = sqlx::query_as::<_, Authorization>(
        "SELECT a.id, a.user_id, a.organization_id, a.client_name, a.is_active, \
                a.created_at, a.last_used_at \
         FROM mcp_access_tokens t \
         JOIN mcp_authorizations a ON a.id = t.authorization_id \
         WHERE t.token_hash = $1 \
           AND t.expires_at > now() \
           AND a.is_active",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    if let Some(authorization) = &authorization {
        let pool = pool.clone();
        let authorization_id = authorization.id;
        tokio::spawn(async move {
            authorizations::touch_last_used(&pool, authorization_id).await;
        });
    }

    Ok(authorization)
}

/// Rotate a refresh token: consume the presented one, drop the access
/// token it came with, and mint a replacement pair — one transaction.
///
/// The `DELETE ... RETURNING` is the claim on the presented token: of two
/// concurrent refreshes, exactly one sees the row and the other gets
/// `InvalidGrant`. Rejections roll the transaction back, leaving the
/// expired/inactive row for the cleanup sweep.
pub async fn refresh_tokens(pool: &PgPool, token: &str) -> Result<TokenResponse, OAuthError> {
    let token_hash = hash_token(token);

    let mut tx = pool.begin().await?;

    let claimed = sqlx::query_as::<_, (sqlx::types::Uuid, chrono::DateTime<Utc>)>(
        "DELETE FROM mcp_refresh_tokens \
         WHERE token_hash = $1 \
         RETURNING authorization_id, expires_at",
    )
    .bind(&token_hash)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((authorization_id, expires_at)) = claimed else {
        return Err(OAuthError::InvalidGrant("Refresh token not found".into()));
    };

    if expires_at <= Utc::now() {
        return Err(OAuthError::InvalidGrant("Refresh token expired".into()));
    }

    let active = sqlx::query_as::<_, (bool,)>(
        "SELECT is_active FROM mcp_authorizations WHERE id = $1",
    )
    .bind(authorization_id)
    .fetch_optional(&mut *tx)
    .await?;

    if !matches!(active, Some((true,))) {
        return Err(OAuthError::InvalidGrant(
            "Authorization is no longer active".into(),
        ));
    }

    // Invalidate the access token(s) the consumed refresh token came with.
    sqlx::query("DELETE FROM mcp_access_tokens WHERE authorization_id = $1")
        .bind(authorization_id)
        .execute(&mut *tx)
        .await?;

    let response = insert_token_pair(&mut tx, authorization_id).await?;
    tx.commit().await?;

    debug!(authorization_id = %authorization_id, "Rotated MCP refresh token");
    Ok(response)
}
