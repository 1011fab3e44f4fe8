//! MCP OAuth authorization server core.
//!
//! Implements the authorization-code + PKCE flow that lets third-party
//! MCP clients obtain organization-bound access tokens on behalf of a
//! logged-in user: code minting and exchange, consent records, token
//! issuance and rotation, and expired-token cleanup.

pub mod authorizations;
pub mod cleanup;
pub mod clients;
pub mod codes;
pub mod issuer;
pub mod pkce;
pub mod tokens;

use thiserror::Error;

/// OAuth errors surfaced at module boundaries.
///
/// Callers match on the variant; the HTTP layer maps variants onto the
/// OAuth2 wire error codes (`invalid_grant`, `server_error`, ...).
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Expired, consumed, or unknown token; failed grant preconditions.
    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}
