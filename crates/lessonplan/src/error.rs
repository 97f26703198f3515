//! Error type returned by every API handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DbError;
use crate::store::StoreError;
use crate::timetable::{GenerateError, RescheduleError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    /// Bad credentials
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    /// Rescheduling ran out of candidate slots
    #[error("{0}")]
    NoSlotAvailable(String),

    /// File, JSON or database failure; the message is passed to the caller
    #[error("{0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoSlotAvailable(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UsernameTaken => AppError::Validation(err.to_string()),
            _ => AppError::Storage(err.to_string()),
        }
    }
}

impl From<RescheduleError> for AppError {
    fn from(err: RescheduleError) -> Self {
        match err {
            RescheduleError::NotFound { .. } => AppError::NotFound(err.to_string()),
            RescheduleError::NoSlotAvailable => AppError::NoSlotAvailable(err.to_string()),
        }
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        AppError::Validation(err.to_string())
    }
}
