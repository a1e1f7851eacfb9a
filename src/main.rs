//! Public Concordances Server
//!
//! Main entry point for the concordance HTTP service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use public_concordances::{
    build_router, AppState, ConcordanceService, MemoryGraph, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "public_concordances={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cache_control = config
        .cache_control_header()
        .context("invalid CACHE_DURATION")?;

    tracing::info!(
        cache_duration = %config.cache_duration,
        graph_data = %config.graph_data.display(),
        log_level = %config.log_level,
        port = config.port,
        "Starting public-concordances"
    );

    let graph = MemoryGraph::load_path(&config.graph_data)
        .with_context(|| format!("loading graph data from {}", config.graph_data.display()))?;
    tracing::info!(
        concepts = graph.concept_count(),
        sources = graph.source_count(),
        "Graph loaded"
    );

    let service = ConcordanceService::new(Arc::new(graph), &config.public_api_url)?;

    let mut state = AppState::new(Arc::new(service), cache_control, &config.app_system_code);
    match std::fs::read_to_string(&config.api_yml) {
        Ok(spec) => state = state.with_api_spec(spec),
        Err(e) => tracing::warn!(
            error = %e,
            file = %config.api_yml.display(),
            "Failed to read the API description, /__api will not be served"
        ),
    }

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, "public-concordances listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves when the signal arrives. Parks forever if the listener fails.
async fn wait_for_signal(signal: impl Future<Output = std::io::Result<()>>, name: &str) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "Failed to listen for signal");
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = wait_for_signal(tokio::signal::ctrl_c(), "ctrl-c");

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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

    tracing::info!("Shutdown signal received");
}
