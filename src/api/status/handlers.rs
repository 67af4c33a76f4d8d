use crate::api::models::*;
use crate::config::StatusMode;
use axum::{extract::State, response::Response};
use chrono::{SecondsFormat, Utc};
use tracing::info;

pub async fn status_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.status_mode {
        StatusMode::Count => {
            let count = state
                .store
                .describe_count()
                .await
                .map_err(|e| state.store_failed(e))?;

            info!(count, "Table item count");
            json_ok(&count)
        }
        StatusMode::Timestamp => json_ok(&StatusTimestamp {
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status_code: 200,
        }),
    }
}
