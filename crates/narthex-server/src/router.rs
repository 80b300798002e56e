use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::{routing::put, Router};
use narthex_store::Registrar;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router. Only `PUT /register/:id` reaches the core; other
/// methods get `405` and other paths `404` from axum itself.
pub fn build_router(registrar: Registrar, max_body_size: usize) -> Router {
    Router::new()
        .route("/register/:id", put(handler::register_handler))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static("narthex"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(registrar)
}
