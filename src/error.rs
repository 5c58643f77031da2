use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SlmError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SlmError::Input(_) => StatusCode::BAD_REQUEST,
            SlmError::Verification(_) => StatusCode::UNAUTHORIZED,
            SlmError::Storage(_) => StatusCode::BAD_GATEWAY,
            SlmError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SlmError::Configuration(_) => "CONFIGURATION_ERROR",
            SlmError::Input(_) => "INVALID_INPUT",
            SlmError::Verification(_) => "INVALID_SIGNATURE",
            SlmError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<redis::RedisError> for SlmError {
    fn from(err: redis::RedisError) -> Self {
        SlmError::Storage(err.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl IntoResponse for SlmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        tracing::error!(
            error = ?self,
            error_code = error_code,
            request_id = %body.request_id,
            "Request failed"
        );

        (status, Json(body)).into_response()
    }
}
