//! Carelink+ intent server
//!
//! Classifies chat messages into community resource categories, asking an
//! OpenAI-compatible model first when configured and falling back to the
//! built-in multilingual lexicons.

use anyhow::Result;
use carelink_server::{create_router, AppState, ServerConfig};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "carelink-server")]
#[command(about = "Carelink+ community resource intent service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "carelink.yaml")]
    config: PathBuf,

    /// Classifier configuration file, overriding the inline section
    #[arg(long, env = "CARELINK_CLASSIFIER_CONFIG")]
    classifier_config: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);
    info!("Starting Carelink+ intent server");

    let mut config = ServerConfig::load(&cli.config)?;
    config.apply_overrides(cli.listen, cli.port, cli.classifier_config);
    info!(config = %cli.config.display(), "Configuration loaded");

    let metrics_handle = init_metrics()?;
    let state = AppState::new(&config, Some(metrics_handle))?;

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("carelink=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carelink=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "carelink_requests_total",
        "Total number of requests by endpoint"
    );
    metrics::describe_counter!(
        "carelink_intent_outcomes_total",
        "Classification outcomes by kind and strategy"
    );
    metrics::describe_counter!(
        "carelink_remote_fallbacks_total",
        "Remote classifications that fell back to the local lexicon, by reason"
    );
    metrics::describe_histogram!(
        "carelink_classify_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds by strategy"
    );
    metrics::describe_counter!("carelink_errors_total", "Total number of errors by type");

    info!("Metrics exporter initialized");
    Ok(handle)
}
