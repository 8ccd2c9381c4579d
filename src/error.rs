use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::auth::{jwt::TokenError, repo::StoreError};

/// Failures of the auth operations, one variant per caller-visible kind.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken(#[source] Option<TokenError>),

    #[error("Service temporarily unavailable")]
    StoreUnavailable(#[source] StoreError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// Logs the cause and hides it from the caller.
    pub fn internal(context: &str, err: impl Display) -> Self {
        error!(error = %err, "{context}");
        AuthError::Internal
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserAlreadyExists => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AuthError::InvalidInput(_) => "BAD_USER_INPUT",
            AuthError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::UserAlreadyExists,
            other => {
                error!(error = %other, "credential store failure");
                AuthError::StoreUnavailable(other)
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InvalidToken(Some(err))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "data": null,
                "errors": [{
                    "message": self.to_string(),
                    "extensions": { "code": self.code() }
                }]
            })),
        )
            .into_response()
    }
}
