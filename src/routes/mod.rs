pub mod intake;

use axum::extract::DefaultBodyLimit;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::HeaderValue;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::SharedState;

/// The intake path answers POST and OPTIONS; every other method gets 405.
/// All of its responses, failures included, allow any origin.
pub fn intake_routes(path: &str, max_body_size: usize) -> Router<SharedState> {
    Router::new()
        .route(
            path,
            post(intake::intake)
                .options(intake::preflight)
                .fallback(intake::method_not_allowed),
        )
        // The configured limit replaces axum's built-in one.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(CatchPanicLayer::custom(intake::handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
}
