//! CodeCoach submission proxy — application entry point.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codecoach_proxy::{
    clients::{HttpEngineClient, HttpProblemCatalogClient},
    config::CONFIG,
    handlers,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting codecoach-proxy...");

    let timeout = std::time::Duration::from_secs(CONFIG.upstream.timeout_secs);
    let engine = Arc::new(HttpEngineClient::new(
        CONFIG.upstream.engine_url.clone(),
        timeout,
    ));
    let catalog = Arc::new(HttpProblemCatalogClient::new(
        CONFIG.upstream.catalog_url.clone(),
        timeout,
    ));

    let state = AppState::new(engine, catalog, CONFIG.clone());

    let app = Router::new()
        .merge(handlers::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(&CONFIG.server.bind_addr).await?;
    tracing::info!("Server listening on http://{}", CONFIG.server.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
