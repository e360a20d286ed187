use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_backend::{app, connect, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let shared_db = match connect(&config.database_url, config.max_connections).await {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, "Failed to prepare database");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, addr = %config.bind_addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!(addr = %config.bind_addr, "Running");

    if let Err(err) = axum::serve(listener, app(shared_db))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "Server stopped with an error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
