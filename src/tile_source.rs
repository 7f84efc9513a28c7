//! Tile source: where a board's tiles come from.

use async_trait::async_trait;
use concentration_game::TileDescriptor;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Why a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FetchErrorKind {
    /// Connection or transfer failure.
    #[display("transport")]
    Transport,
    /// The service answered with a non-success status.
    #[display("status")]
    Status,
    /// The body was not a JSON array of tiles.
    #[display("decode")]
    Decode,
    /// The board does not have the expected number of tiles.
    #[display("tile count")]
    TileCount,
}

/// Failure to obtain a board.
#[derive(Debug, Clone, Display, Error)]
#[display("Fetch error ({}): {} at {}:{}", kind, message, file, line)]
pub struct FetchError {
    /// Failure category.
    pub kind: FetchErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FetchError {
    /// Creates a new fetch error with caller location tracking.
    #[track_caller]
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_status() {
            FetchErrorKind::Status
        } else if err.is_decode() {
            FetchErrorKind::Decode
        } else {
            FetchErrorKind::Transport
        };
        Self::new(kind, err.to_string())
    }
}

/// Anything that can produce the tiles for a new board.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Fetches the full, unshuffled tile set.
    async fn fetch_board(&self) -> Result<Vec<TileDescriptor>, FetchError>;
}

/// Tile source backed by one GET request to the tile service.
#[derive(Debug, Clone)]
pub struct HttpTileSource {
    endpoint: String,
    expected_tiles: Option<usize>,
    client: reqwest::Client,
}

impl HttpTileSource {
    /// Creates a source for `endpoint`.
    ///
    /// With `expected_tiles` set, boards of any other size are rejected.
    #[instrument(skip(endpoint), fields(endpoint = %endpoint.as_ref()))]
    pub fn new(endpoint: impl AsRef<str>, expected_tiles: Option<usize>) -> Self {
        Self {
            endpoint: endpoint.as_ref().to_string(),
            expected_tiles,
            client: reqwest::Client::new(),
        }
    }

    /// The URL this source fetches from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_board(&self) -> Result<Vec<TileDescriptor>, FetchError> {
        debug!("Fetching tiles");

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Tile service returned an error status");
            return Err(FetchError::new(
                FetchErrorKind::Status,
                format!("HTTP {}", status),
            ));
        }

        let body = response.text().await?;
        let tiles: Vec<TileDescriptor> = serde_json::from_str(&body).map_err(|e| {
            FetchError::new(FetchErrorKind::Decode, format!("Invalid tile list: {}", e))
        })?;

        if let Some(expected) = self.expected_tiles
            && tiles.len() != expected
        {
            return Err(FetchError::new(
                FetchErrorKind::TileCount,
                format!("expected {} tiles, got {}", expected, tiles.len()),
            ));
        }

        info!(count = tiles.len(), "Tiles fetched");
        Ok(tiles)
    }
}
