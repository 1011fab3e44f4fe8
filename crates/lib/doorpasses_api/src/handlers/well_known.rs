//! OAuth 2.0 Authorization Server Metadata (RFC 8414).

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

/// Subset of the RFC 8414 metadata document this server implements.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub registration_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
}

fn build_metadata(issuer_url: &str) -> AuthorizationServerMetadata {
    let base = issuer_url.trim_end_matches('/');
    AuthorizationServerMetadata {
        issuer: base.to_string(),
        authorization_endpoint: format!("{base}/oauth/authorize"),
        token_endpoint: format!("{base}/oauth/token"),
        registration_endpoint: format!("{base}/oauth/register"),
        response_types_supported: vec!["code".to_string()],
        grant_types_supported: vec![
            "authorization_code".to_string(),
            "refresh_token".to_string(),
        ],
        token_endpoint_auth_methods_supported: vec!["none".to_string()],
        code_challenge_methods_supported: vec!["S256".to_string(), "plain".to_string()],
    }
}

/// `GET /.well-known/oauth-authorization-server` — discovery document.
pub async fn oauth_metadata_handler(
    State(state): State<AppState>,
) -> Json<AuthorizationServerMetadata> {
    Json(build_metadata(&state.config.issuer_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_endpoints_derive_from_issuer() {
        let meta = build_metadata("https://api.doorpasses.io/");
        assert_eq!(meta.issuer, "https://api.doorpasses.io");
        assert_eq!(
            meta.authorization_endpoint,
            "https://api.doorpasses.io/oauth/authorize"
        );
        assert_eq!(meta.token_endpoint, "https://api.doorpasses.io/oauth/token");
        assert_eq!(
            meta.registration_endpoint,
            "https://api.doorpasses.io/oauth/register"
        );
        assert!(meta.code_challenge_methods_supported.contains(&"S256".to_string()));
    }
}
