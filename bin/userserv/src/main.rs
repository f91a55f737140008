//! userserv - HTTP user-record service
//!
//! Records live in memory only and are lost on restart.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userserv::config::{Args, Config, LogFormat, LoggingConfig};
use userserv::transport::{self, AppState};
use userserv_core::UserStore;
use userserv_core::middleware::metrics::describe_metrics;

fn init_tracing(logging: &LoggingConfig) {
    let json = logging.format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logging.level.clone().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load config file if it exists; CLI flags take precedence
    let config = Config::load(&args.config)?.merge_args(&args);

    init_tracing(&config.logging);

    info!("Starting userserv");
    info!("Config file: {}", args.config.display());

    let metrics = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;
        describe_metrics();
        info!("Metrics endpoint: /metrics");
        Some(handle)
    } else {
        info!("Metrics are DISABLED");
        None
    };

    let users = userserv::build_service(UserStore::new(), metrics.is_some());
    let state = Arc::new(AppState { users, metrics });

    let app = transport::router(state).layer(TraceLayer::new_for_http());

    // Parse listen address
    let addr: SocketAddr = config.server.listen.parse().map_err(|e| {
        anyhow::anyhow!("Invalid listen address {}: {}", config.server.listen, e)
    })?;

    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down...");
        })
        .await?;

    info!("userserv shut down gracefully");

    Ok(())
}
