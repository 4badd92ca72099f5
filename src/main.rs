//! Film website server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                    SITE SERVER                   │
//!                    │                                                  │
//!  Client Request    │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!  ──────────────────┼─▶│  http    │──▶│ security │──▶│   routing   │   │
//!                    │  │ server   │   │ nonce    │   │ route table │   │
//!                    │  └──────────┘   └──────────┘   └──────┬──────┘   │
//!                    │                                       ▼          │
//!  Client Response   │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!  ◀─────────────────┼──│ hardening│◀──│   CSP    │◀──│  handlers   │   │
//!                    │  │ headers  │   │  header  │   │ + templates │   │
//!                    │  └──────────┘   └──────────┘   └─────────────┘   │
//!                    │                                                  │
//!                    │   registrar: route table + csp_policy mapping    │
//!                    │   config / observability / lifecycle             │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use film_site::config::loader::{load_config, resolve_debug, DEBUG_ENV};
use film_site::config::SiteConfig;
use film_site::lifecycle::{spawn_signal_listener, Shutdown};
use film_site::observability::{logging, metrics};
use film_site::{registrar, SiteServer};

#[derive(Parser, Debug)]
#[command(name = "film-site", version, about = "Serve the film website")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Development mode: report-only CSP, no HSTS.
    #[arg(long)]
    debug: bool,

    /// Validate the configuration, print the CSP header and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };
    config.debug = resolve_debug(
        config.debug,
        std::env::var(DEBUG_ENV).ok().as_deref(),
        cli.debug,
    );
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("film-site v{} starting", env!("CARGO_PKG_VERSION"));

    let bind_address: SocketAddr = config.listener.bind_address.parse()?;
    let metrics_enabled = config.observability.metrics_enabled;
    let metrics_address = config.observability.metrics_address.clone();

    let app = registrar::build(config)?;
    let policy = &app.config().csp_policy;

    tracing::info!(
        bind_address = %bind_address,
        debug = app.debug(),
        csp_header = %policy.header_name(),
        "Configuration loaded"
    );

    if cli.check {
        println!("{}: {}", policy.header_name(), policy.header_value(None));
        return Ok(());
    }

    if metrics_enabled {
        metrics::init_metrics(metrics_address.parse()?)?;
    }

    let server = SiteServer::new(app)?;

    let listener = TcpListener::bind(bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());
    server.run(listener, shutdown.signalled()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
