//! Service error types and their HTTP mapping.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use userdoc_core::{error::DocumentStoreError, user::ValidationError};

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] DocumentStoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn invalid_payload() -> Self {
        ApiError::MalformedRequest("Invalid request payload".to_string())
    }

    pub fn missing_username() -> Self {
        ApiError::MalformedRequest("username not found".to_string())
    }

    pub fn user_not_found() -> Self {
        ApiError::NotFound("User not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::MalformedRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                "Internal Server Error".to_string()
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
