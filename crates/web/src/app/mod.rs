//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: content backend, normalizer, identity providers, session keys
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: error pages and JSON error bodies

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let session_state = middleware::SessionState {
        keys: services.sessions.clone(),
    };
    let services = Arc::new(services);

    let pages = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            session_state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(pages)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
