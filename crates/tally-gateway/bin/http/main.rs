mod cli;

use crate::cli::CLI;
use clap::Parser;
use tally_gateway::{App, Backend};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    tally_telemetry::init(config.log_format.into())?;

    let backend = Backend::select(config.redis_url, config.data_dir);
    info!(
        listen_addr = %config.listen_addr,
        backend = backend.name(),
        log_format = %config.log_format,
        "starting tally gateway"
    );

    let state = backend.connect().await?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
