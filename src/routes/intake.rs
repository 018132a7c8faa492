use std::any::Any;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::intake::{parser, pipeline};
use crate::state::SharedState;

pub async fn intake(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let fields = parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?;

    let normalized = pipeline::normalize(
        &state.config,
        &fields,
        &headers,
        Some(addr.ip()),
        chrono::Utc::now(),
    )?;

    let sink_response = state.sink.send(&normalized.record).await?;
    tracing::info!(
        event_id = %normalized.record.event_id,
        "Record forwarded to sink: {sink_response}"
    );

    let body = if state.config.echo_geo {
        json!({ "success": true, "geo": normalized.geo })
    } else {
        json!({ "success": true })
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn preflight() -> Response {
    (
        [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Methods", "POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    AppError::Internal(format!("Handler panicked: {detail}")).into_response()
}
