//! Shared helpers for database-backed tests.

use sqlx::PgPool;

use crate::db::DbManager;
use crate::uuid::uuidv7;

/// Boot an ephemeral PostgreSQL instance and run migrations.
///
/// Keep the returned manager alive for the duration of the test and stop
/// it at the end; dropping it leaves the server running.
pub(crate) async fn start_test_db() -> (DbManager, PgPool) {
    let mut db = DbManager::ephemeral().await.expect("ephemeral DbManager");
    db.setup().await.expect("db setup");
    db.start().await.expect("db start");

    let pool = PgPool::connect(&db.connection_url())
        .await
        .expect("connect to ephemeral PostgreSQL");
    crate::migrate::migrate(&pool).await.expect("run migrations");

    (db, pool)
}

/// Insert a user and an organization, returning their ids.
pub(crate) async fn seed_user_org(pool: &PgPool) -> (uuid::Uuid, uuid::Uuid) {
    let user_id = uuidv7();
    sqlx::query("INSERT INTO users (id, email, name) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(format!("{user_id}@doorpasses.io"))
        .bind("Test User")
        .execute(pool)
        .await
        .expect("insert user");

    let organization_id = uuidv7();
    sqlx::query("INSERT INTO organizations (id, name) VALUES ($1, $2)")
        .bind(organization_id)
        .bind("Acme Corp")
        .execute(pool)
        .await
        .expect("insert organization");

    (user_id, organization_id)
}
