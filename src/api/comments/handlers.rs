use crate::api::models::*;
use crate::storage::{decode_items, ScanFilter};
use axum::{
    extract::{Query, State},
    response::Response,
};
use tracing::info;

pub async fn all_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let items = state
        .store
        .scan(None)
        .await
        .map_err(|e| state.store_failed(e))?;

    let comments = decode_items(&items);
    info!(found = comments.len(), "Listed comments");

    json_ok(&comments)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = SearchParams::from_pairs(pairs);
    let filter = ScanFilter::from_params(params.id.as_deref(), params.score.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    info!(id = ?params.id, score = ?params.score, kind = ?filter.kind(), "Searching");

    let items = state
        .store
        .scan(Some(&filter))
        .await
        .map_err(|e| state.store_failed(e))?;

    let comments = decode_items(&items);
    info!(found = comments.len(), "Search complete");

    json_ok(&comments)
}
