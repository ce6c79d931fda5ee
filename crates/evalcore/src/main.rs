//! evalcore - sandboxed compile-run-compare evaluation engine

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evalcore::config::Config;
use evalcore::metrics::{self, MetricsServer};
use evalcore::state::AppState;
use evalcore::{handlers, workspace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evalcore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting evalcore");

    let config = Config::from_env();
    metrics::init_metrics();

    tokio::fs::create_dir_all(&config.storage.base_dir).await?;

    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = MetricsServer::run(metrics_port).await {
            tracing::error!("metrics server error: {e}");
        }
    });

    let state = AppState::new(config.clone());

    let sweep_base_dir = config.storage.base_dir.clone();
    let sweep_interval = Duration::from_secs(config.sweep.interval_secs);
    let sweep_max_age = Duration::from_secs(config.sweep.workspace_max_age_secs);
    let sweep_registry = state.registry().clone_handle();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let removed = workspace::sweep(&sweep_base_dir, sweep_max_age, &sweep_registry).await;
            if removed > 0 {
                metrics::record_sweep(removed);
            }
        }
    });

    let app = Router::new()
        .merge(handlers::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("evalcore listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
