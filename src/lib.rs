pub mod config;
pub mod error;
pub mod state;
pub mod intake;
pub mod routes;
pub mod sink;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::sink::Sink;
use crate::state::{AppState, SharedState};

/// Assemble the service around an injected sink so tests can substitute
/// their own.
pub fn build_app(config: Config, sink: Arc<dyn Sink>) -> Router {
    let intake = routes::intake_routes(&config.intake_path, config.max_body_size);

    let state: SharedState = Arc::new(AppState { config, sink });

    Router::new()
        .merge(intake)
        .route("/health", axum::routing::get(health))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
