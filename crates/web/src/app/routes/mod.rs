use axum::{Router, routing::get};

pub mod auth;
pub mod categories;
pub mod products;
pub mod system;

/// Router for all session-aware endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/", get(products::index))
        .route("/products/:id", get(products::show))
        .route("/categories/:id", get(categories::show))
        .nest("/auth", auth::router())
        .nest("/api", api_router())
}

/// JSON data loaders.
fn api_router() -> Router {
    Router::new()
        .route("/products", get(products::list_json))
        .route("/products/:id", get(products::show_json))
        .route("/auth/session", get(auth::session_json))
}
