//! API routes

use axum::{
    routing::{post, MethodRouter},
    Router,
};

use super::handlers::{self, AppState};

/// Method table applied to every path
fn webhook_methods() -> MethodRouter<AppState> {
    post(handlers::receive_alert)
        .get(handlers::browse)
        .fallback(handlers::unsupported_method)
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", webhook_methods())
        .route("/*path", webhook_methods())
        .with_state(state)
}
