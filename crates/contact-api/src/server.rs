//! Server bootstrap: tracing, state wiring, and the HTTP listener

use anyhow::Context;
use contact_core::{
    ContactMetricsRegistry, HttpMailRelay, InMemoryMessageStore, MessageStore, SledMessageStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};
use crate::handler::{create_router, AppState};

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

/// Open the store, mail relay, and metrics for a validated config
pub fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn MessageStore> = match &config.data_dir {
        Some(dir) => Arc::new(
            SledMessageStore::open(dir)
                .with_context(|| format!("failed to open message store at {}", dir.display()))?,
        ),
        None => {
            tracing::warn!("CONTACT_DATA_DIR not set; messages are kept in memory only");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    let transport = Arc::new(
        HttpMailRelay::new(&config.mailer).context("failed to build mail relay client")?,
    );
    let metrics =
        Arc::new(ContactMetricsRegistry::new().context("failed to register contact metrics")?);

    Ok(AppState::new(
        store,
        transport,
        &config.mailer,
        metrics,
        config.admin_token.clone(),
    ))
}

/// Bind and serve until ctrl-c
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;

    tracing::info!(
        addr = %config.bind_addr,
        store = state.service.store_backend(),
        relay = %config.mailer.relay_url,
        "Starting contact relay"
    );

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Contact relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
