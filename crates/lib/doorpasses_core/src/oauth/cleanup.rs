//! Expired-token cleanup.
//!
//! Expired rows are already invisible to validation and refresh, so the
//! sweep is about table size, not correctness. It runs once per day at
//! 03:00 UTC.

use chrono::{Days, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

use super::OAuthError;

/// Hour of day (UTC) at which the sweep runs.
const SWEEP_HOUR_UTC: u32 = 3;

/// Row counts removed by one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub access_tokens: u64,
    pub refresh_tokens: u64,
}

impl SweepStats {
    pub fn total(&self) -> u64 {
        self.access_tokens + self.refresh_tokens
    }
}

/// Delete all expired access and refresh tokens.
pub async fn delete_expired_tokens(pool: &PgPool) -> Result<SweepStats, OAuthError> {
    let access = sqlx::query("DELETE FROM mcp_access_tokens WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    let refresh = sqlx::query("DELETE FROM mcp_refresh_tokens WHERE expires_at <= now()")
        .execute(pool)
        .await?;

    Ok(SweepStats {
        access_tokens: access.rows_affected(),
        refresh_tokens: refresh.rows_affected(),
    })
}

/// Duration from `now` until the next 03:00 UTC.
fn next_sweep_delay(now: chrono::DateTime<Utc>) -> Duration {
    let today = now
        .date_naive()
        .and_hms_opt(SWEEP_HOUR_UTC, 0, 0)
        .unwrap_or(now.naive_utc())
        .and_utc();

    let next = if today > now {
        today
    } else {
        now.date_naive()
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(SWEEP_HOUR_UTC, 0, 0))
            .unwrap_or(now.naive_utc())
            .and_utc()
    };

    (next - now).to_std().unwrap_or(Duration::from_secs(60 * 60))
}

/// Spawn the daily sweep task. Runs until the process exits.
pub fn spawn_sweep_task(pool: PgPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(next_sweep_delay(Utc::now())).await;
            match delete_expired_tokens(&pool).await {
                Ok(stats) if stats.total() > 0 => {
                    info!(
                        access_tokens = stats.access_tokens,
                        refresh_tokens = stats.refresh_tokens,
                        "Swept expired MCP tokens"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Expired-token sweep failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn delay_before_sweep_hour_targets_same_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 1, 0, 0).unwrap();
        assert_eq!(next_sweep_delay(now), Duration::from_secs(2 * 60 * 60));
    }

    #[test]
    fn delay_after_sweep_hour_targets_next_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap();
        assert_eq!(next_sweep_delay(now), Duration::from_secs(23 * 60 * 60));
    }

    #[test]
    fn delay_at_sweep_hour_targets_next_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap();
        assert_eq!(next_sweep_delay(now), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn stats_total_sums_both_tables() {
        let stats = SweepStats {
            access_tokens: 3,
            refresh_tokens: 2,
        };
        assert_eq!(stats.total(), 5);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL binaries on PATH"]
    async fn sweep_deletes_only_expired_rows() {
        use crate::oauth::tokens::{generate_token, hash_token};
        use crate::uuid::uuidv7;

        let (mut db, pool) = crate::testkit::start_test_db().await;
        let (user_id, organization_id) = crate::testkit::seed_user_org(&pool).await;
        let authorization = crate::oauth::authorizations::get_or_create(
            &pool,
            user_id,
            organization_id,
            "Claude Desktop",
        )
        .await
        .expect("authorization");

        // One live pair from the issuer, one expired row per table.
        crate::oauth::issuer::issue_tokens(&pool, authorization.id)
            .await
            .expect("issue");
        for table in ["mcp_access_tokens", "mcp_refresh_tokens"] {
            sqlx::query(&format!(
                "INSERT INTO {table} (id, authorization_id, token_hash, expires_at) \
                 VALUES ($1, $2, $3, now() - interval '1 hour')"
            ))
            .bind(uuidv7())
            .bind(authorization.id)
            .bind(hash_token(&generate_token()))
            .execute(&pool)
            .await
            .expect("insert expired row");
        }

        let stats = delete_expired_tokens(&pool).await.expect("sweep");
        assert_eq!(stats.access_tokens, 1);
        assert_eq!(stats.refresh_tokens, 1);

        // Nothing left to delete on a second pass.
        let stats = delete_expired_tokens(&pool).await.expect("sweep");
        assert_eq!(stats.total(), 0);

        db.stop().await.expect("db stop");
    }
}
