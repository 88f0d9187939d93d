// src/errors.rs

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use maud::Markup;
use serde_json::json;
use thiserror::Error;

use crate::staging::MAX_STAGED_IMAGES;

#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Unprocessable input: {0}")]
    UnprocessableEntity(String),

    #[error("Staging limit exceeded: {staged} staged, {incoming} incoming")]
    StagingLimitExceeded { staged: usize, incoming: usize },

    #[error("Persistence call failed: {0}")]
    PersistenceFailed(String),

    #[error("Conflicting editor state: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    InternalServerError(String),

    #[error("Unprocessable input")]
    UnprocessableEntityWithHtml(Markup),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Io(io_error) => {
                tracing::error!("I/O error: {:?}", io_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while writing files".to_string(),
                )
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::StagingLimitExceeded { staged, incoming } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "You can only upload up to {} images ({} already staged, {} more selected)",
                    MAX_STAGED_IMAGES, staged, incoming
                ),
            ),
            AppError::PersistenceFailed(message) => {
                tracing::error!("Persistence call failed: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "The product could not be saved to the external store".to_string(),
                )
            }
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            AppError::UnprocessableEntityWithHtml(markup) => {
                return (StatusCode::UNPROCESSABLE_ENTITY, markup.into_string()).into_response();
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Multipart processing error: {:?}", err);
        AppError::UnprocessableEntity(format!("Malformed form data: {}", err))
    }
}
