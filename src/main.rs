//! SkillForge ML Engine
//!
//! Course recommendation and difficulty estimation service.
//!
//! # Architecture
//!
//! - **Recommendation Engine**: mastery-weighted course ranking
//! - **Difficulty Estimator**: heuristic difficulty buckets
//! - **API Server**: REST endpoints for the SkillForge backend
//!
//! # Graceful Shutdown
//!
//! SIGTERM and SIGINT stop accepting connections and let in-flight requests
//! complete before the process exits.

use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillforge::api::{self, AppState};
use skillforge::{Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  🚀 SkillForge ML Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");
    info!("  Components:");
    info!("    • Recommendation Engine");
    info!("    • Difficulty Estimator");
    info!("    • REST API Server");
    info!("═══════════════════════════════════════════════════════════════");

    // Load configuration
    let config = Config::from_env()?;
    info!("✅ Configuration loaded and validated");

    #[allow(unused_mut)]
    let mut state = AppState::from_config(&config);

    #[cfg(feature = "prometheus")]
    {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| skillforge::Error::Config {
                message: "Failed to install Prometheus recorder".into(),
                source: Some(Box::new(e)),
            })?;
        state.prometheus = Some(handle);
        info!("✅ Prometheus recorder installed");
    }

    info!(
        "  🔗 Health: http://{}:{}/health",
        config.api.host, config.api.port
    );

    api::start_server(&config, state, shutdown_signal()).await?;

    info!("👋 SkillForge ML Engine stopped gracefully");
    Ok(())
}

/// Initialize structured logging with tracing
///
/// `LOG_FORMAT=json` switches to one JSON object per line for log shippers.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skillforge=debug,tower_http=debug,info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(std::env::var("NO_COLOR").is_err()),
            )
            .init();
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("📴 Shutdown signal received, draining in-flight requests");
}
