//! Configuration for the game client and the tile service.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable that overrides [`AppConfig::endpoint`].
pub const ENDPOINT_ENV: &str = "CONCENTRATION_ENDPOINT";

/// Top-level configuration, read from `concentration.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL the tile list is fetched from.
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Number of tiles a board must have. `0` accepts any count.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Delay before a completed pair is resolved, in milliseconds.
    #[serde(default = "default_commit_delay_ms")]
    commit_delay_ms: u64,

    /// Grid columns in the terminal view.
    #[serde(default = "default_columns")]
    columns: usize,

    /// Log file for the terminal client.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Fixed shuffle seed, for reproducible boards.
    #[serde(default)]
    seed: Option<u64>,

    /// Tile service settings.
    #[serde(default)]
    server: ServerConfig,
}

/// Settings for `concentration serve`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Base URL written into each tile's `file_name`.
    #[serde(default = "default_public_url")]
    public_url: String,

    /// Directory holding the tile images.
    #[serde(default = "default_asset_dir")]
    asset_dir: PathBuf,

    /// Number of tiles served.
    #[serde(default = "default_tile_count")]
    tile_count: usize,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/get_tiles".to_string()
}

fn default_board_size() -> usize {
    16
}

fn default_commit_delay_ms() -> u64 {
    500
}

fn default_columns() -> usize {
    4
}

fn default_log_file() -> PathBuf {
    PathBuf::from("concentration.log")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets/tiles")
}

fn default_tile_count() -> usize {
    16
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            asset_dir: default_asset_dir(),
            tile_count: default_tile_count(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            board_size: default_board_size(),
            commit_delay_ms: default_commit_delay_ms(),
            columns: default_columns(),
            log_file: default_log_file(),
            seed: None,
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(endpoint = %config.endpoint, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults, then
    /// applies the [`ENDPOINT_ENV`] override.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(path, std::env::var(ENDPOINT_ENV).ok())
    }

    /// Same as [`AppConfig::resolve`] with the environment endpoint passed in.
    /// The result is validated after the override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn resolve_with(
        path: impl AsRef<Path>,
        env_endpoint: Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        if let Some(endpoint) = env_endpoint {
            debug!(%endpoint, "Endpoint overridden from environment");
            config.endpoint = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    /// Replaces the tile endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the shuffle seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the expected board size (`0` accepts any count).
    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    /// Board size the tile source enforces, if any.
    pub fn expected_tiles(&self) -> Option<usize> {
        (self.board_size > 0).then_some(self.board_size)
    }

    /// Replaces the commit delay.
    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Mutable access to the tile service settings.
    pub fn server_mut(&mut self) -> &mut ServerConfig {
        &mut self.server
    }

    /// Commit delay as a [`Duration`].
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Checks the settings. Run again after applying command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::new("columns must be at least 1".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::new("endpoint must not be empty".to_string()));
        }
        if self.server.tile_count == 0 {
            return Err(ConfigError::new(
                "server.tile_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Overrides the bind host.
    pub fn set_host(&mut self, host: String) {
        self.host = host;
    }

    /// Overrides the bind port.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Overrides the asset directory.
    pub fn set_asset_dir(&mut self, asset_dir: PathBuf) {
        self.asset_dir = asset_dir;
    }

    /// Overrides the public base URL.
    pub fn set_public_url(&mut self, public_url: String) {
        self.public_url = public_url;
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
