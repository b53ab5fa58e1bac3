//! botbooker API server (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  BOTBOOKER API                   │
//!                    │                                                  │
//!   Client Request   │  ┌──────────┐   ┌──────────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│  http    │──▶│ trace context│──▶│ handlers │  │
//!                    │  │ server   │   │  middleware  │   │          │  │
//!                    │  └──────────┘   └──────────────┘   └────┬─────┘  │
//!                    │                                         │        │
//!                    │               ┌─────────────────────────┤        │
//!                    │               ▼                         ▼        │
//!                    │     ┌───────────────────┐    ┌─────────────────┐ │
//!                    │     │TraceContextReader │    │HealthAggregator │ │
//!                    │     │  + diagnostic hook│    │  + probes       │ │
//!                    │     └───────────────────┘    └─────────────────┘ │
//!                    │                                                  │
//!                    │  config · logging · metrics · lifecycle          │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use botbooker_api::config::{load_config, validation::validate_config, ConfigError, ServiceConfig};
use botbooker_api::lifecycle::{launch, Shutdown};
use botbooker_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "botbooker-api")]
#[command(about = "Booking service API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "BOTBOOKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long, env = "BOTBOOKER_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "botbooker-api starting");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    launch(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
