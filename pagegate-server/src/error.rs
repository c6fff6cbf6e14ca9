//! Error types for the pagegate server

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagegate_core::error::FacadeError;
use serde::Serialize;
use thiserror::Error;

/// Server-wide result type
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Facade(#[from] FacadeError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Facade(FacadeError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Facade(FacadeError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Facade(FacadeError::Transport(_) | FacadeError::MalformedResponse(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Facade(FacadeError::UpstreamStatus { status, .. }) => {
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Facade(FacadeError::Serialization(_) | FacadeError::Initialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::BadRequest(message) => ErrorResponse {
                error: "validation",
                message: message.clone(),
                upstream_status: None,
            },
            ApiError::Facade(err) => {
                let kind = err.kind().as_str();
                if status.is_server_error() {
                    tracing::error!(kind, "Query failed: {}", err);
                } else {
                    tracing::warn!(kind, "Query rejected: {}", err);
                }

                let message = match err {
                    FacadeError::Serialization(_) | FacadeError::Initialization(_) => {
                        "An internal error occurred".to_string()
                    }
                    FacadeError::UpstreamStatus { message, .. } => message.clone(),
                    other => other.to_string(),
                };

                ErrorResponse {
                    error: kind,
                    message,
                    upstream_status: err.upstream_status(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
