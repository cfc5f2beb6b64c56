//! Patchbay - Message-routing switchboard
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (port 12345, route.rt, patchbay.toml if present)
//! patchbay
//!
//! # Override the port and routing file
//! patchbay --port 4000 --routes wiring.rt
//! ```
//!
//! Once running, type `help` on the console for the command set.

use anyhow::Result;
use clap::Parser;
use patchbay_config::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use patchbay::server;

/// Patchbay - Message-routing switchboard
#[derive(Parser, Debug)]
#[command(name = "patchbay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "patchbay.toml")]
    config: std::path::PathBuf,

    /// Listen port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Routing definition file (overrides the config file)
    #[arg(short, long)]
    routes: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(routes) = cli.routes {
        config.routes.file = routes;
    }

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log.level.as_str());
    init_logging(level)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    server::run(config, cancel).await
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
