//! Policy Ledger API Server
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin insurance-ledger-api
//!
//! # Override settings through the environment
//! API__PORT=9000 API__LOG_FORMAT=json API__JWT_SECRET=... cargo run --bin insurance-ledger-api
//! ```
//!
//! # Environment Variables
//!
//! * `API__HOST` - Server host (default: 0.0.0.0)
//! * `API__PORT` - Server port (default: 8080)
//! * `API__JWT_SECRET` - JWT signing secret (required in production)
//! * `API__JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API__LOG_LEVEL` - Log level used when `RUST_LOG` is unset (default: info)
//! * `API__LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API__LEDGER__...` - Ledger parameters, e.g. `API__LEDGER__POLICY__GRACE_PERIOD`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SystemClock;
use domain_ledger::{LedgerService, LoggingPayout};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        base_premium = %config.ledger.policy.base_premium,
        grace_period_secs = config.ledger.policy.grace_period.num_seconds(),
        max_coverage = %config.ledger.claims.max_coverage,
        "Starting Policy Ledger API Server"
    );

    let service = LedgerService::from_config(
        config.ledger.clone(),
        Arc::new(SystemClock),
        Arc::new(LoggingPayout),
    )?;

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;
    let app = create_router(service, config);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Installs the tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
