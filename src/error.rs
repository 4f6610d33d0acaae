use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Field name → human-readable message, returned verbatim as the error body.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Build a single-entry `FieldErrors` map.
pub fn field_error(field: &'static str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, message.into());
    errors
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("Not found: {0:?}")]
    NotFound(FieldErrors),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0:?}")]
    Forbidden(FieldErrors),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation(field_error(field, message))
    }

    pub fn not_found(field: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound(field_error(field, message))
    }

    pub fn not_authorized() -> Self {
        AppError::Forbidden(field_error("notauthorized", "User not authorized"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::NotFound(errors) => (StatusCode::NOT_FOUND, Json(errors)).into_response(),
            // Ownership failures share 401 with authentication failures
            AppError::Forbidden(errors) => {
                (StatusCode::UNAUTHORIZED, Json(errors)).into_response()
            }
            AppError::Body(rejection) => (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response(),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            other => {
                tracing::error!("{}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
