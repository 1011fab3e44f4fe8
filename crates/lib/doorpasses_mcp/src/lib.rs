//! # doorpasses_mcp
//!
//! MCP (Model Context Protocol) server for DoorPasses.
//!
//! Provides an HTTP MCP endpoint with bearer token authentication. The
//! server is built as a library crate; `doorpasses_api_server` wires it
//! up alongside the OAuth endpoints.

pub mod auth;
pub mod registry;
pub mod server;
pub mod tools;
pub mod types;

use std::sync::Arc;

use sqlx::PgPool;

use registry::ToolRegistry;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build an Axum router serving the MCP endpoint at `POST /mcp`.
///
/// The router includes bearer token authentication middleware. Every
/// request must carry `Authorization: Bearer <token>` where the token was
/// issued by the OAuth token endpoint.
///
/// # Arguments
///
/// * `pool` — shared database connection pool (same pool as the REST API).
/// * `registry` — tool registry, populated before the server starts.
pub fn mcp_router(pool: PgPool, registry: Arc<ToolRegistry>) -> axum::Router {
    axum::Router::new()
        .route("/mcp", axum::routing::post(server::handle_mcp))
        .with_state(registry)
        .layer(axum::middleware::from_fn_with_state(
            pool,
            auth::mcp_auth_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
