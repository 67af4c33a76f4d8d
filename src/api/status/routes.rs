use crate::api::models::AppState;
use crate::api::status::handlers::status_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kparajul/status", get(status_handler))
}
