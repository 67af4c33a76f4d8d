use crate::api::comments::handlers::{all_handler, search_handler};
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kparajul/all", get(all_handler))
        .route("/kparajul/search", get(search_handler))
}
