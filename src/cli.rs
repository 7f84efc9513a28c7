//! Command-line interface for concentration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concentration - tile-pairing memory game
#[derive(Parser, Debug)]
#[command(name = "concentration")]
#[command(about = "Tile-pairing memory game for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "concentration.toml", global = true)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Tile service endpoint (overrides config and environment)
        #[arg(long)]
        endpoint: Option<String>,

        /// Shuffle seed for a reproducible board
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the tile service
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Directory containing the tile images
        #[arg(long)]
        asset_dir: Option<PathBuf>,

        /// Base URL written into each tile's file_name
        #[arg(long)]
        public_url: Option<String>,
    },
}
