pub mod audit_layer;
pub mod comments;
pub mod models;
pub mod status;

// Re-exports
pub use models::*;

use axum::{http::Method, http::Uri, middleware, Router};
use tower_http::trace::TraceLayer;

/// Build the full router: three GET endpoints, 405 on method mismatch, 404 otherwise
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(status::routes())
        .merge(comments::routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            audit_layer::audit_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("Method {} not allowed on {}", method, uri.path()))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
