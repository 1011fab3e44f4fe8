//! OAuth request handlers — client registration, authorization, token
//! exchange.
//!
//! The authorize endpoint is session-guarded JSON (the platform UI calls
//! it after showing the consent screen and redirects the browser itself);
//! registration and token exchange are public, authenticated by the
//! artifacts they carry.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doorpasses_core::identity::{sso_enforced, user_in_organization};
use doorpasses_core::models::oauth::TokenResponse;
use doorpasses_core::oauth::authorizations;
use doorpasses_core::oauth::clients;
use doorpasses_core::oauth::codes::CreateCodeParams;
use doorpasses_core::oauth::issuer;
use doorpasses_core::oauth::pkce::CodeChallengeMethod;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::session::CurrentUser;

// === Client registration ===

/// Body of `POST /oauth/register` (RFC 7591 subset).
#[derive(Debug, Deserialize)]
pub struct RegisterClientRequest {
    pub client_name: String,
    pub redirect_uris: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterClientResponse {
    pub client_id: String,
    pub client_name: String,
    pub redirect_uris: Vec<String>,
}

/// `POST /oauth/register` — dynamically register an OAuth client.
pub async fn register_client_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterClientRequest>,
) -> AppResult<(StatusCode, Json<RegisterClientResponse>)> {
    if body.client_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("client_name is required".into()));
    }
    if body.redirect_uris.is_empty() {
        return Err(AppError::InvalidRequest(
            "At least one redirect_uri is required".into(),
        ));
    }
    for uri in &body.redirect_uris {
        url::Url::parse(uri).map_err(|_| {
            AppError::InvalidRequest(format!("Invalid redirect_uri: {uri}"))
        })?;
    }

    let client =
        clients::register_client(&state.pool, &body.client_name, &body.redirect_uris).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterClientResponse {
            client_id: client.client_id,
            client_name: client.client_name,
            redirect_uris: client.redirect_uris,
        }),
    ))
}

// === Authorization ===

/// Body of `POST /oauth/authorize`.
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub client_id: String,
    pub organization_id: Uuid,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// `POST /oauth/authorize` — approve a client for an organization.
///
/// Requires a platform session. Returns the authorization code; the UI
/// appends it (and the echoed `state`) to the validated redirect URI.
pub async fn authorize_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<AuthorizeRequest>,
) -> AppResult<Json<AuthorizeResponse>> {
    let client = clients::find_client(&state.pool, &body.client_id)
        .await?
        .ok_or_else(|| AppError::InvalidClient(format!("Unknown client: {}", body.client_id)))?;

    url::Url::parse(&body.redirect_uri)
        .map_err(|_| AppError::InvalidRequest("redirect_uri is not a valid URL".into()))?;
    if !clients::redirect_uri_allowed(&client, &body.redirect_uri) {
        return Err(AppError::InvalidRequest(
            "redirect_uri is not registered for this client".into(),
        ));
    }

    if !user_in_organization(&state.pool, user.user_id, body.organization_id).await? {
        return Err(AppError::AccessDenied(
            "User does not belong to this organization".into(),
        ));
    }

    if sso_enforced(&state.pool, body.organization_id).await? && !user.sso {
        return Err(AppError::AccessDenied(
            "Organization requires an SSO login".into(),
        ));
    }

    let code_challenge_method = match body.code_challenge_method.as_deref() {
        Some(m) => Some(CodeChallengeMethod::parse(m).ok_or_else(|| {
            AppError::InvalidRequest(format!("Unsupported code_challenge_method: {m}"))
        })?),
        None => None,
    };

    let code = state
        .codes
        .create_authorization_code(CreateCodeParams {
            user_id: user.user_id,
            organization_id: body.organization_id,
            client_name: client.client_name,
            code_challenge: body.code_challenge,
            code_challenge_method,
        })
        .await;

    Ok(Json(AuthorizeResponse {
        code,
        state: body.state,
    }))
}

// === Token exchange ===

/// Body of `POST /oauth/token` (form-encoded per RFC 6749).
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub refresh_token: Option<String>,
}

/// `POST /oauth/token` — exchange a code or refresh token for a pair.
pub async fn token_handler(
    State(state): State<AppState>,
    Form(body): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    match body.grant_type.as_str() {
        "authorization_code" => {
            let code = body
                .code
                .ok_or_else(|| AppError::InvalidRequest("code is required".into()))?;

            let entry = state
                .codes
                .exchange_authorization_code(&code, body.code_verifier.as_deref())
                .await?;

            let authorization = authorizations::get_or_create(
                &state.pool,
                entry.user_id,
                entry.organization_id,
                &entry.client_name,
            )
            .await?;

            let response = issuer::issue_tokens(&state.pool, authorization.id).await?;
            Ok(Json(response))
        }
        "refresh_token" => {
            let refresh_token = body
                .refresh_token
                .ok_or_else(|| AppError::InvalidRequest("refresh_token is required".into()))?;

            let response = issuer::refresh_tokens(&state.pool, &refresh_token).await?;
            Ok(Json(response))
        }
        other => Err(AppError::UnsupportedGrantType(format!(
            "Grant type '{other}' is not supported"
        ))),
    }
}
