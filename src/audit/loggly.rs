use crate::audit::{log_locally, AuditError, AuditEvent, AuditSink};
use reqwest::Client;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::warn;

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Ships audit events to a Loggly HTTP input
#[derive(Clone)]
pub struct LogglyAuditSink {
    client: Client,
    url: String,
}

impl std::fmt::Debug for LogglyAuditSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // url embeds the token
        f.debug_struct("LogglyAuditSink").finish_non_exhaustive()
    }
}

impl LogglyAuditSink {
    pub fn new(endpoint: &str, token: &str, tag: &str) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(AuditError::Client)?;

        Ok(Self {
            client,
            url: input_url(endpoint, token, tag),
        })
    }

    /// Post one event and wait for the collector to accept it
    async fn ship(client: Client, url: String, event: AuditEvent) -> Result<(), AuditError> {
        client
            .post(&url)
            .json(&event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn input_url(endpoint: &str, token: &str, tag: &str) -> String {
    format!("{}/{}/tag/{}/", endpoint.trim_end_matches('/'), token, tag)
}

impl AuditSink for LogglyAuditSink {
    fn emit(&self, event: AuditEvent) {
        log_locally(&event);

        let Ok(handle) = Handle::try_current() else {
            warn!("No async runtime, audit event not shipped");
            return;
        };

        let client = self.client.clone();
        let url = self.url.clone();
        handle.spawn(async move {
            if let Err(e) = Self::ship(client, url, event).await {
                warn!(error = %e, "Failed to ship audit event");
            }
        });
    }
}
