use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use sigist_core::db::DbError;
use sigist_core::{PublishError, StoreError};

/// Failure while bringing the service up or serving connections.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open db: {0}")]
    Db(#[from] DbError),
    #[error("failed to create event publisher: {0}")]
    Publisher(#[from] PublishError),
    #[error("failed to start listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("failed to serve http: {0}")]
    Serve(#[source] std::io::Error),
}

/// Request-scoped failure rendered as an [`HttpError`] body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to decode request: {0}")]
    MalformedPayload(String),
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error body: `{error_code, message, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
    pub error_code: u16,
    pub message: String,
    pub error: String,
}

/// Acknowledgement body: `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Success {
    pub code: u16,
    pub message: String,
}

impl Success {
    pub(crate) fn response(status: StatusCode, message: &str) -> Response {
        let body = Self {
            code: status.as_u16(),
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            Self::MalformedPayload(detail) => (
                StatusCode::BAD_REQUEST,
                "failed to decode request",
                detail.clone(),
            ),
            Self::Store { message, source } => {
                (StatusCode::INTERNAL_SERVER_ERROR, *message, source.to_string())
            }
            Self::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
                detail.clone(),
            ),
        };

        if status.is_server_error() {
            error!(
                "event=http_error module=http status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=http_error module=http status={} error={}",
                status.as_u16(),
                self
            );
        }

        let body = HttpError {
            error_code: status.as_u16(),
            message: message.to_string(),
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}
