use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String, details: Option<Value> },

    #[error("Authorization token is required")]
    MissingToken,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserExists,

    #[error("{0} already exists")]
    ResourceExists(String),

    #[error("Email or password is incorrect")]
    WrongCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn forbidden() -> Self {
        AppError::Forbidden("You have no privilege to perform this action".to_string())
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        AppError::InvalidParams {
            message: message.into(),
            details: None,
        }
    }

    /// Response code string carried in the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidParams { .. } => "INVALID_PARAMS",
            AppError::MissingToken => "MISSING_TOKEN",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidToken(_) => "INVALID_TOKEN",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::UserExists => "USER_EXIST",
            AppError::ResourceExists(_) => "RESOURCE_EXIST",
            AppError::WrongCredentials => "WRONG_CREDENTIALS",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Database(_) | AppError::Internal(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParams { .. } => StatusCode::FORBIDDEN,
            AppError::MissingToken | AppError::Unauthorized | AppError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) | AppError::UserExists | AppError::ResourceExists(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::WrongCredentials | AppError::BadRequest(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidParams {
            message: errors.to_string(),
            details: serde_json::to_value(&errors).ok(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, data) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Something went wrong".to_string(), Value::Null)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                ("Something went wrong".to_string(), Value::Null)
            }
            AppError::InvalidParams { message, details } => {
                tracing::debug!(%message, "rejected request parameters");
                (message, details.unwrap_or(Value::Null))
            }
            other => {
                tracing::debug!(code, "request rejected: {}", other);
                (other.to_string(), Value::Null)
            }
        };

        ApiResponse {
            code,
            status_code: status.as_u16(),
            message,
            data,
        }
        .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
