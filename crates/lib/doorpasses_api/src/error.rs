//! Application error types.
//!
//! Every error leaving the API is rendered in the OAuth2 wire shape
//! `{error, error_description}` with the matching HTTP status, including
//! the non-OAuth endpoints, so clients parse one error format.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use doorpasses_core::oauth::OAuthError;
use doorpasses_core::oauth::codes::CodeExchangeError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid client: {0}")]
    InvalidClient(String),

    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    ServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, description) = match &self {
            AppError::InvalidRequest(m) => (StatusCode::BAD_REQUEST, "invalid_request", m.as_str()),
            AppError::InvalidClient(m) => (StatusCode::UNAUTHORIZED, "invalid_client", m.as_str()),
            AppError::InvalidGrant(m) => (StatusCode::BAD_REQUEST, "invalid_grant", m.as_str()),
            AppError::UnsupportedGrantType(m) => {
                (StatusCode::BAD_REQUEST, "unsupported_grant_type", m.as_str())
            }
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::AccessDenied(m) => (StatusCode::FORBIDDEN, "access_denied", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::ServerError(m) => {
                error!(error = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "The server encountered an unexpected error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: code.to_string(),
            error_description: description.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::ServerError(e.to_string()),
        }
    }
}

impl From<OAuthError> for AppError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::InvalidGrant(m) => AppError::InvalidGrant(m),
            OAuthError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<CodeExchangeError> for AppError {
    fn from(e: CodeExchangeError) -> Self {
        AppError::InvalidGrant(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_exchange_failures_map_to_invalid_grant() {
        for e in [
            CodeExchangeError::CodeNotFound,
            CodeExchangeError::CodeExpired,
            CodeExchangeError::PkceMismatch,
        ] {
            assert!(matches!(AppError::from(e), AppError::InvalidGrant(_)));
        }
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
