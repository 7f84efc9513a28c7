//! Concentration - unified CLI
//!
//! Terminal game client and the tile service it talks to.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use concentration::{AppConfig, TileService};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.config)?;

    match cli.command {
        Command::Play { endpoint, seed } => run_play(config, endpoint, seed).await,
        Command::Serve {
            port,
            host,
            asset_dir,
            public_url,
        } => run_serve(config, port, host, asset_dir, public_url).await,
    }
}

/// Run the terminal game
async fn run_play(mut config: AppConfig, endpoint: Option<String>, seed: Option<u64>) -> Result<()> {
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    config.validate()?;
    concentration::run_tui(config).await
}

/// Run the tile service
#[instrument(skip(config))]
async fn run_serve(
    mut config: AppConfig,
    port: Option<u16>,
    host: Option<String>,
    asset_dir: Option<std::path::PathBuf>,
    public_url: Option<String>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = config.server_mut();
    if let Some(port) = port {
        server.set_port(port);
    }
    if let Some(host) = host {
        server.set_host(host);
    }
    if let Some(asset_dir) = asset_dir {
        server.set_asset_dir(asset_dir);
    }
    if let Some(public_url) = public_url {
        server.set_public_url(public_url);
    }
    config.validate()?;

    info!("Starting tile service");
    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };
    let service = TileService::new(config.server(), &mut rng);
    concentration::serve(config.server(), service).await
}
