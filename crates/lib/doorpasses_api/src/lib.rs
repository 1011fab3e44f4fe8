//! # doorpasses_api
//!
//! HTTP API library for the DoorPasses MCP authorization server.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use doorpasses_core::oauth::codes::AuthCodeCache;

use crate::config::ApiConfig;
use crate::handlers::{connections, oauth, well_known};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// In-memory authorization code cache.
    pub codes: Arc<AuthCodeCache>,
}

/// Run embedded database migrations.
///
/// Delegates to `doorpasses_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    doorpasses_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (authenticated by the artifacts they carry)
    let public = Router::new()
        .route(
            "/.well-known/oauth-authorization-server",
            get(well_known::oauth_metadata_handler),
        )
        .route("/oauth/register", post(oauth::register_client_handler))
        .route("/oauth/token", post(oauth::token_handler));

    // Session-guarded routes (require a platform login)
    let guarded = Router::new()
        .route("/oauth/authorize", post(oauth::authorize_handler))
        .route(
            "/api/connections",
            get(connections::list_connections_handler),
        )
        .route(
            "/api/connections/{id}",
            delete(connections::revoke_connection_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session::require_session,
        ));

    Router::new()
        .merge(public)
        .merge(guarded)
        .layer(cors)
        .with_state(state)
}
