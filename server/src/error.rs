use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every failure in the chat core is classified into one of these variants.
/// Validation rejects happen before any store access; existence (NotFound)
/// is always checked before authorization (Permission).
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("you are sending messages too quickly, slow down")]
    RateLimited,

    #[error("storage error")]
    Store(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(String),
}

impl ChatError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ChatError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ChatError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ChatError::Permission(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ChatError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ChatError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ChatError::Store(err) => {
                // Details stay in server logs; clients get a generic retry message.
                error!(error = %err, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, please try again".to_string(),
                )
            }
            ChatError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, please try again".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
