// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::repositories::RepositoryError;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(RepositoryError),
    NotFound(String),
    ValidationError(String),
    UnsupportedMediaType(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn unsupported_media_type(msg: impl Into<String>) -> Self {
        AppError::UnsupportedMediaType(msg.into())
    }

    /// The NotFound error every id lookup reports.
    pub fn product_not_found(id: i64) -> Self {
        Self::not_found(format!("Product with id '{id}' was not found."))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "{e}"),
            AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::UnsupportedMediaType(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "Repository failure");
                "Database error occurred".to_string()
            }
            AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::UnsupportedMediaType(msg) => msg,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::DatabaseError(err)
    }
}
