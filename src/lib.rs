//! Concentration - tile-pairing memory game.
//!
//! Wires the pure game logic in [`concentration_game`] to the outside
//! world.
//!
//! # Architecture
//!
//! - **Tile source**: fetches the board from the tile service ([`HttpTileSource`])
//! - **Runtime**: applies events and runs effects on tokio ([`GameRuntime`])
//! - **Assets**: loads each face image once per board ([`FaceImages`])
//! - **TUI**: ratatui grid with mouse and keyboard input ([`run_tui`])
//! - **Server**: the tile service itself ([`TileService`])
//!
//! # Example
//!
//! ```no_run
//! use concentration::{GameRuntime, HttpTileSource};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let source = Arc::new(HttpTileSource::new("http://127.0.0.1:5000/get_tiles", Some(16)));
//! let mut runtime = GameRuntime::new(source, Duration::from_millis(500), None);
//! runtime.start();
//! runtime.settle().await;
//! runtime.click(0);
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assets;
mod config;
mod runtime;
mod server;
mod tile_source;
mod tui;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, ENDPOINT_ENV, ServerConfig};

// Crate-level exports - Tile source
pub use tile_source::{FetchError, FetchErrorKind, HttpTileSource, TileSource};

// Crate-level exports - Assets
pub use assets::{FaceImage, FaceImages, ImageLoadError, ProbeReport, load_image};

// Crate-level exports - Runtime
pub use runtime::GameRuntime;

// Crate-level exports - Tile service
pub use server::{TILES_ROUTE, TileService, catalog, serve};

// Crate-level exports - Terminal UI
pub use tui::{
    App, LOADING_TEXT, RESET_LABEL, ScreenLayout, Target, draw, enter_screen, face_label,
    grid_cells, hit_test, leave_screen, move_cursor, run_tui,
};

// Crate-level exports - Game types
pub use concentration_game::{
    Board, Effect, GameEvent, GameState, PairOutcome, PendingCommit, Selection, SessionPhase,
    TileDescriptor, TileState, Transition, is_pair, shuffle,
};
