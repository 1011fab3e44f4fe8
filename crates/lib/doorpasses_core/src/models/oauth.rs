//! MCP OAuth domain models.

use serde::{Deserialize, Serialize};

// =============================================================================
// DB row structs
// =============================================================================

/// Database row for `oauth_clients` — a dynamically registered MCP client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OAuthClient {
    pub id: sqlx::types::Uuid,
    /// Wire identifier presented in authorize/token requests.
    pub client_id: String,
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Database row for `mcp_authorizations` — a user's consent to a client
/// within one organization.
///
/// Revocation flips `is_active` instead of deleting, so the audit trail
/// survives. `last_used_at` is touched opportunistically on token
/// validation.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub id: sqlx::types::Uuid,
    pub user_id: sqlx::types::Uuid,
    pub organization_id: sqlx::types::Uuid,
    pub client_name: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_used_at: Option<chrono::DateTime<chrono::Utc>>,
}

// =============================================================================
// Wire types
// =============================================================================

/// OAuth2 token endpoint success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}
