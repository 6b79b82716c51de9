//! Crypto Signals API Server
//!
//! HTTP API over the signal board, market data and the signing proxy.
//! A cron scheduler refreshes the board in the background.

use cryptosignals::config::AppConfig;
use cryptosignals::core::http::start_server;
use cryptosignals::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = AppConfig::from_env()?;
    info!("Starting Crypto Signals API Server");
    info!(environment = %config.environment, "Environment");
    info!(mode = %config.engine.mode, "Signal mode");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
