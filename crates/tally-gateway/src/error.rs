use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tally_core::{CoreError, CounterError};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request was malformed; nothing was read or written.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The storage backend failed.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<CounterError> for AppError {
    fn from(value: CounterError) -> Self {
        match value {
            CounterError::InvalidSlug(message) => Self::BadRequest(format!("invalid slug: {message}")),
            CounterError::InvalidAction(message) => {
                Self::BadRequest(format!("invalid action: {message}"))
            }
            CounterError::Storage(message) => Self::Unavailable(message),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        CounterError::from(value).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable(message) => {
                error!(error = %message, "storage backend failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "counter storage is unavailable".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
