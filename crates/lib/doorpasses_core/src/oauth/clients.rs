//! Dynamically registered OAuth clients.
//!
//! MCP clients register themselves before starting the flow and are
//! looked up by their wire `client_id` at authorize time.

use sqlx::PgPool;

use super::OAuthError;
use super::tokens::generate_client_id;
use crate::models::oauth::OAuthClient;
use crate::uuid::uuidv7;

/// Register a client, minting a fresh wire `client_id`.
pub async fn register_client(
    pool: &PgPool,
    client_name: &str,
    redirect_uris: &[String],
) -> Result<OAuthClient, OAuthError> {
    let client = sqlx::query_as::<_, OAuthClient>(
        "INSERT INTO oauth_clients (id, client_id, client_name, redirect_uris) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, client_id, client_name, redirect_uris, created_at",
    )
    .bind(uuidv7())
    .bind(generate_client_id())
    .bind(client_name)
    .bind(redirect_uris)
    .fetch_one(pool)
    .await?;

    Ok(client)
}

/// Look up a client by its wire `client_id`.
pub async fn find_client(
    pool: &PgPool,
    client_id: &str,
) -> Result<Option<OAuthClient>, OAuthError> {
    let client = sqlx::query_as::<_, OAuthClient>(
        "SELECT id, client_id, client_name, redirect_uris, created_at \
         FROM oauth_clients \
         WHERE client_id = $1",
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Whether `redirect_uri` was registered for the client.
pub fn redirect_uri_allowed(client: &OAuthClient, redirect_uri: &str) -> bool {
    client.redirect_uris.iter().any(|uri| uri == redirect_uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(uris: &[&str]) -> OAuthClient {
        OAuthClient {
            id: uuidv7(),
            client_id: generate_client_id(),
            client_name: "claude".into(),
            redirect_uris: uris.iter().map(|u| u.to_string()).collect(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn registered_redirect_uri_is_allowed() {
        let client = client(&["https://client.example/callback"]);
        assert!(redirect_uri_allowed(
            &client,
            "https://client.example/callback"
        ));
    }

    #[test]
    fn unregistered_redirect_uri_is_rejected() {
        let client = client(&["https://client.example/callback"]);
        assert!(!redirect_uri_allowed(&client, "https://evil.example/steal"));
        // Exact match, no prefix allowance
        assert!(!redirect_uri_allowed(
            &client,
            "https://client.example/callback/extra"
        ));
    }
}
