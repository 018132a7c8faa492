use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    /// The sink answered with a non-success status; carries its raw body.
    SinkRejected(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::SinkRejected(body) => write!(f, "Sink rejected record: {body}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected submission: {msg}");
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::MethodNotAllowed => {
                tracing::warn!("Rejected request with unsupported method");
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    json!({ "message": "Method not allowed" }),
                )
            }
            AppError::SinkRejected(details) => {
                tracing::error!("Sink rejected record: {details}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Sink error", "details": details }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": INTERNAL_ERROR_MESSAGE }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

impl From<crate::sink::SinkError> for AppError {
    fn from(err: crate::sink::SinkError) -> Self {
        match err {
            crate::sink::SinkError::Rejected { body, .. } => AppError::SinkRejected(body),
            crate::sink::SinkError::Transport(msg) => AppError::Internal(msg),
        }
    }
}
