pub mod loggly;

pub use loggly::LogglyAuditSink;

use crate::config::AuditConfig;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit HTTP client could not be built: {0}")]
    Client(reqwest::Error),

    #[error("audit delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Error,
}

/// One out-of-band audit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub level: AuditLevel,
    pub message: String,
}

impl AuditEvent {
    /// Completed-request event
    pub fn request(method: &str, source: &str, path: &str, status: u16) -> Self {
        Self {
            level: AuditLevel::Info,
            message: format!(
                "Method type: {method}, source IP address: {source}, request path: {path}, HTTP status code: {status}"
            ),
        }
    }

    /// Backing-store failure event
    pub fn store_error(detail: impl std::fmt::Display) -> Self {
        Self {
            level: AuditLevel::Error,
            message: format!("error scanning database: {detail}"),
        }
    }
}

/// Fire-and-forget audit delivery.
///
/// `emit` must return immediately; delivery failures never reach the caller.
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

/// Local-only sink used when no log-collection token is configured
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        log_locally(&event);
    }
}

pub(crate) fn log_locally(event: &AuditEvent) {
    match event.level {
        AuditLevel::Info => info!(target: "audit", "{}", event.message),
        AuditLevel::Error => error!(target: "audit", "{}", event.message),
    }
}

/// Pick the sink for this process
pub fn sink_from_config(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, AuditError> {
    match &config.token {
        Some(token) => Ok(Arc::new(LogglyAuditSink::new(
            &config.endpoint,
            token,
            &config.tag,
        )?)),
        None => {
            info!("No audit token configured, audit events stay local");
            Ok(Arc::new(TracingAuditSink))
        }
    }
}
