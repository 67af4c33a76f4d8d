use crate::audit::{AuditEvent, AuditSink};
use crate::config::StatusMode;
use crate::storage::{CommentStore, StoreError};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CommentStore>,
    pub audit: Arc<dyn AuditSink>,
    pub status_mode: StatusMode,
}

impl AppState {
    /// Report a store failure once and turn it into a terminal response
    pub fn store_failed(&self, error: StoreError) -> AppError {
        self.audit.emit(AuditEvent::store_error(&error));
        AppError::Store(error.to_string())
    }
}

/// A comment as returned to clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub score: i64,
}

/// Query parameters for the search endpoint
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub id: Option<String>,
    pub score: Option<String>,
}

impl SearchParams {
    /// Take the first `id` and first `score` from raw query pairs; repeats are ignored
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "id" => &mut params.id,
                "score" => &mut params.score,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Status body in timestamp mode
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusTimestamp {
    pub time: String,
    pub status_code: u16,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed(String),
    Store(String),
    Encoding(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(_) | AppError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::Store(msg)
            | AppError::Encoding(msg) => msg,
        };

        (status, Json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        }))
        .into_response()
    }
}

/// Serialize `value` as a 200 JSON response; serialization failure becomes a 500
pub fn json_ok<T: Serialize>(value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value).map_err(|e| {
        tracing::error!(error = %e, "Response encoding failed");
        AppError::Encoding(e.to_string())
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
