use crate::api::models::AppState;
use crate::audit::AuditEvent;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Browsers ask for this on every page load; not worth an audit line
const FAVICON_PATH: &str = "/favicon.ico";

/// Emit one audit event per completed request, carrying the final status
pub async fn audit_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let source = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    if path != FAVICON_PATH {
        state.audit.emit(AuditEvent::request(
            method.as_str(),
            &source,
            &path,
            response.status().as_u16(),
        ));
    }

    response
}
