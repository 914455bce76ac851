use analytics::AnalyticsError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use curriculum::CurriculumError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("{0}")]
    Validation(#[from] CoreError),
    #[error("{0}")]
    Analytics(#[from] AnalyticsError),
    #[error("{0}")]
    Curriculum(#[from] CurriculumError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(DbError::NotFound) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Analytics(AnalyticsError::UnknownReport(_)) => StatusCode::NOT_FOUND,
            AppError::Analytics(AnalyticsError::UnknownFilter(_)) => StatusCode::BAD_REQUEST,
            AppError::Curriculum(CurriculumError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Curriculum(CurriculumError::IndexOutOfRange { .. })
            | AppError::Curriculum(CurriculumError::UnknownSection(_)) => StatusCode::NOT_FOUND,
            AppError::Curriculum(CurriculumError::Invalid(_)) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Database(DbError::NotFound) => "Record not found".to_string(),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                "An internal database error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
