//! Wayfarer REST API and WebSocket server entry point.
//!
//! Binary name: `wayfarer`
//!
//! Parses CLI arguments, loads configuration and secrets, wires the
//! providers into the application state, then serves the API.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "wayfarer", about = "Conversational travel assistant backend")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "wayfarer.toml")]
    config: PathBuf,

    /// Bind address, overriding the config file (e.g. 0.0.0.0:8080).
    #[arg(long)]
    bind: Option<String>,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,wayfarer=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = wayfarer_infra::config::load_config(&cli.config).await;
    let secrets = wayfarer_infra::config::secrets_from_env()?;

    let state = AppState::init(&config, secrets);
    let router = http::router::build_router(state);

    let addr = cli.bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "wayfarer API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
