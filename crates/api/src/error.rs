//! Unified error handling for the API.
//!
//! Provides a unified `AppError` type that logs server errors before
//! responding to the client. All route handlers should return
//! `Result<T, AppError>`. Responses are JSON of the shape
//! `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::services::uploads::UploadError;
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Image upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Store(err) => match err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
                StoreError::Database(_) | StoreError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Store(_) | AuthError::Hashing => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::Store(inner) => match inner {
                    StoreError::NotFound => StatusCode::NOT_FOUND,
                    StoreError::Conflict(_) => StatusCode::CONFLICT,
                    StoreError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
                    StoreError::Database(_) | StoreError::DataCorruption(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                },
                OrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Upload(err) => match err {
                UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Store(err) => match err {
                    StoreError::NotFound => "Not found".to_string(),
                    StoreError::Conflict(msg) => msg.clone(),
                    StoreError::InsufficientStock(_) => "Insufficient stock".to_string(),
                    _ => "Internal server error".to_string(),
                },
                Self::Auth(err) => match err {
                    AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                    AuthError::EmailTaken => {
                        "An account with this email already exists".to_string()
                    }
                    AuthError::WeakPassword(msg) => msg.clone(),
                    AuthError::InvalidEmail => "Invalid email address".to_string(),
                    AuthError::InvalidToken => "Invalid or expired token".to_string(),
                    _ => "Authentication error".to_string(),
                },
                Self::NotFound(msg)
                | Self::Unauthorized(msg)
                | Self::Forbidden(msg)
                | Self::BadRequest(msg) => msg.clone(),
                Self::Order(err) => err.to_string(),
                Self::Upload(err) => err.to_string(),
                Self::Internal(_) => "Internal server error".to_string(),
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_)
            | Self::Store(StoreError::Database(_) | StoreError::DataCorruption(_)) => true,
            Self::Auth(err) => matches!(err, AuthError::Store(_) | AuthError::Hashing),
            Self::Order(err) => {
                matches!(
                    err,
                    OrderError::Store(
                        StoreError::Database(_) | StoreError::DataCorruption(_)
                    )
                )
            }
            Self::Upload(err) => matches!(err, UploadError::Io(_)),
            _ => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
