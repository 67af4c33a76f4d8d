mod api;
mod audit;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::DynamoCommentStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting comment lookup API");

    // Missing or broken config is fatal
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Table: {}", config.store.table_name);
    info!("   - Status mode: {:?}", config.status.mode);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    let store = DynamoCommentStore::from_config(&config.store).await;
    let audit = audit::sink_from_config(&config.audit)?;

    let state = AppState {
        store: Arc::new(store),
        audit,
        status_mode: config.status.mode,
    };

    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("   GET  /kparajul/status  - Table status");
    info!("   GET  /kparajul/all     - List all comments");
    info!("   GET  /kparajul/search  - Filter by id and/or score");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
