//! Error types for the catalog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book with ID {0} not found")]
    BookNotFound(i64),

    #[error("Book copy with ID {0} not found")]
    CopyNotFound(i64),

    #[error("{0}")]
    DuplicateBook(String),

    #[error("This copy does not belong to the specified book.")]
    CopyBookMismatch { book_id: i64, copy_id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn duplicate_book() -> Self {
        AppError::DuplicateBook("Book with same title or ISBN already exists.".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BookNotFound(_) | AppError::CopyNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateBook(_) => StatusCode::CONFLICT,
            AppError::CopyBookMismatch { .. } | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
///
/// `path` is filled in by the error context middleware once the request URI is known.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            path: None,
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
