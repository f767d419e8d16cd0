// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::polling_service::PollingService;
use crate::infrastructure::config::{load_clusters_config, load_server_config};
use crate::infrastructure::prometheus_repository::PrometheusRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    cluster_settings, health_check, list_intervals, scaler_chart, stream_scaler_chart,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server_config = load_server_config().context("Failed to load config/server")?;
    let clusters_config = load_clusters_config().context("Failed to load config/clusters")?;
    let settings = server_config.server;

    tracing::info!(
        "Loaded {} cluster(s), tick labels in {:?}",
        clusters_config.clusters.len(),
        settings.tick_zone
    );

    // Create repository (infrastructure layer)
    let repository = Arc::new(PrometheusRepository::new(
        settings.api_base,
        settings.bearer_token,
    ));

    // Create services (application layer)
    let chart_service = ChartService::new(repository, clusters_config, settings.tick_zone);
    let polling_service = PollingService::new(
        chart_service.clone(),
        Duration::from_secs(settings.refresh_secs.max(1)),
    );

    let state = Arc::new(AppState {
        chart_service,
        polling_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/intervals", get(list_intervals))
        .route("/clusters/:cluster/settings", get(cluster_settings))
        .route("/clusters/:cluster/keda/chart", get(scaler_chart))
        .route("/clusters/:cluster/keda/stream", get(stream_scaler_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = settings
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen_addr {}", settings.listen_addr))?;
    tracing::info!("Starting keda-metrics-charts service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
