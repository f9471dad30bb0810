use super::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to load seed database '{path}': {message}")]
    Seed { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for BackendError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => BackendError::NotFound(e.to_string()),
            StoreError::Invalid(message) => BackendError::Invalid(message),
            StoreError::ActorClosed | StoreError::ActorDropped => {
                BackendError::Unavailable(e.to_string())
            }
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            BackendError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            BackendError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            BackendError::Invalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            BackendError::Unavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            BackendError::Seed { .. } | BackendError::Io(_) => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
