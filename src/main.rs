//! chatrelay - relays chat lines between rich text formats
//!
//! Reads lines from stdin, decodes them with the configured input format
//! (IRC control codes, ANSI, caret codes, ...) and writes each one through
//! every configured output template and formatter.

mod common;
mod config;
mod formatters;
mod relay;
mod string;
mod template;

use anyhow::Result;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use config::{env::get_config_path, load_and_validate, Config};
use relay::{Relay, StdinConnection};
use string::FormatterRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("chatrelay v{} starting...", env!("CARGO_PKG_VERSION"));

    let formatters = formatters::default_registry();
    debug!(formatters = ?formatters.names(), "Formatters registered");

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path, &formatters).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Connection: {}", config.relay.name);
    info!("  Input format: {}", config.relay.input_format);
    for output in &config.relay.outputs {
        info!("  Output: {} ({})", output.name, output.format);
    }

    run(config, formatters).await?;

    info!("Exiting...");
    Ok(())
}

async fn run(config: Config, formatters: FormatterRegistry) -> common::error::Result<()> {
    let connection = StdinConnection::new(&config.relay, &formatters);
    let relay = Relay::new(&config, &formatters, connection.info().clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        shutdown_signal().await;
        if let Err(e) = shutdown_tx.send(true) {
            debug!("Shutdown channel closed (input already finished): {}", e);
        }
    });

    let (input, output) = tokio::join!(
        connection.run(tokio::io::stdin(), tx, shutdown_rx),
        relay.run(rx, tokio::io::stdout()),
    );
    input?;
    output?;
    Ok(())
}

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
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
