mod config;
mod error;
mod routes;
mod state;

use clap::Parser;
use roadprism_core::create_road_graph;
use tokio::{net::TcpListener, signal, task};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Args, ServerConfig},
    routes::create_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_args(Args::parse())?;

    info!(
        "Loading road graph from {} and {}",
        config.nodes_path.display(),
        config.edges_path.display()
    );
    let graph_config = config.graph_config();
    let graph = task::spawn_blocking(move || create_road_graph(&graph_config)).await??;
    info!(
        "Road graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let app = create_router(AppState::new(graph, config.detour_ratio), &config);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}
