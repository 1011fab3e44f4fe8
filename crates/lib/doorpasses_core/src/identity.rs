//! Platform identity lookups.
//!
//! The MCP authorization flow rides on the platform's own session and
//! membership tables. Session tokens are stored hashed, same scheme as
//! the MCP tokens.

use sqlx::PgPool;
use uuid::Uuid;

use crate::oauth::tokens::hash_token;

/// The user behind a platform session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    /// Whether the session was established through an SSO provider.
    pub sso: bool,
}

/// Resolve a session token to its user, if the session is live.
pub async fn resolve_session(
    pool: &PgPool,
    session_token: &str,
) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query_as::<_, (Uuid, bool)>(
        "SELECT user_id, sso FROM sessions \
         WHERE token_hash = $1 AND expires_at > now()",
    )
    .bind(hash_token(session_token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(user_id, sso)| SessionUser { user_id, sso }))
}

/// Whether the user belongs to the organization.
pub async fn user_in_organization(
    pool: &PgPool,
    user_id: Uuid,
    organization_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM organization_memberships \
         WHERE user_id = $1 AND organization_id = $2",
    )
    .bind(user_id)
    .bind(organization_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0 > 0)
}

/// Whether the organization requires SSO-established sessions.
pub async fn sso_enforced(pool: &PgPool, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_as::<_, (bool,)>(
        "SELECT require_sso FROM organizations WHERE id = $1",
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(require_sso,)| require_sso).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::tokens::generate_token;
    use crate::testkit::{seed_user_org, start_test_db};
    use crate::uuid::uuidv7;

    async fn insert_session(pool: &PgPool, user_id: Uuid, sso: bool, lifetime: &str) -> String {
        let token = generate_token();
        sqlx::query(&format!(
            "INSERT INTO sessions (id, user_id, token_hash, sso, expires_at) \
             VALUES ($1, $2, $3, $4, now() + interval '{lifetime}')"
        ))
        .bind(uuidv7())
        .bind(user_id)
        .bind(hash_token(&token))
        .bind(sso)
        .execute(pool)
        .await
        .expect("insert session");
        token
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL binaries on PATH"]
    async fn sessions_memberships_and_sso_flags_resolve() {
        let (mut db, pool) = start_test_db().await;
        let (user_id, organization_id) = seed_user_org(&pool).await;

        let live = insert_session(&pool, user_id, true, "1 day").await;
        let resolved = resolve_session(&pool, &live)
            .await
            .expect("resolve")
            .expect("session");
        assert_eq!(resolved.user_id, user_id);
        assert!(resolved.sso);

        let expired = insert_session(&pool, user_id, false, "-1 hour").await;
        assert!(resolve_session(&pool, &expired).await.expect("resolve").is_none());
        assert!(
            resolve_session(&pool, "no-such-token")
                .await
                .expect("resolve")
                .is_none()
        );

        assert!(
            !user_in_organization(&pool, user_id, organization_id)
                .await
                .expect("membership")
        );
        sqlx::query(
            "INSERT INTO organization_memberships (user_id, organization_id) VALUES ($1, $2)",
        )
        .bind(user_id)
        .bind(organization_id)
        .execute(&pool)
        .await
        .expect("insert membership");
        assert!(
            user_in_organization(&pool, user_id, organization_id)
                .await
                .expect("membership")
        );

        assert!(!sso_enforced(&pool, organization_id).await.expect("sso"));
        sqlx::query("UPDATE organizations SET require_sso = true WHERE id = $1")
            .bind(organization_id)
            .execute(&pool)
            .await
            .expect("set require_sso");
        assert!(sso_enforced(&pool, organization_id).await.expect("sso"));

        db.stop().await.expect("db stop");
    }
}
