//! HTTP tile service: the tile list plus the tile images.

use crate::config::ServerConfig;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use concentration_game::{TileDescriptor, shuffle};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Route serving the tile list.
pub const TILES_ROUTE: &str = "/get_tiles";

/// Shared state behind the service routes.
#[derive(Debug, Clone)]
pub struct TileService {
    tiles: Arc<Vec<TileDescriptor>>,
    asset_dir: Arc<PathBuf>,
}

impl TileService {
    /// Builds the service with tiles `1..=tile_count`, shuffled once here
    /// and served in that order for the life of the process.
    #[instrument(skip(config, rng), fields(tile_count = config.tile_count()))]
    pub fn new<R: Rng + ?Sized>(config: &ServerConfig, rng: &mut R) -> Self {
        let tiles = shuffle(catalog(config.public_url(), *config.tile_count()), rng);
        info!(
            asset_dir = %config.asset_dir().display(),
            "Tile service initialised"
        );
        Self {
            tiles: Arc::new(tiles),
            asset_dir: Arc::new(config.asset_dir().clone()),
        }
    }

    /// The tiles in serving order.
    pub fn tiles(&self) -> &[TileDescriptor] {
        &self.tiles
    }

    /// Router exposing the service.
    pub fn router(self) -> Router {
        Router::new()
            .route(TILES_ROUTE, get(get_tiles))
            .route("/assets/{file_name}", get(get_asset))
            .route("/health", get(health))
            .with_state(self)
    }
}

/// Tiles numbered `1..=count`, each pointing at
/// `{public_url}/assets/tile_image_{n}.png`.
pub fn catalog(public_url: &str, count: usize) -> Vec<TileDescriptor> {
    let base = public_url.trim_end_matches('/');
    (1..=count as i64)
        .map(|n| TileDescriptor::new(n, format!("{}/assets/tile_image_{}.png", base, n)))
        .collect()
}

#[instrument(skip(service))]
async fn get_tiles(State(service): State<TileService>) -> Json<Vec<TileDescriptor>> {
    debug!(count = service.tiles.len(), "Serving tile list");
    Json(service.tiles.as_ref().clone())
}

#[instrument(skip(service))]
async fn get_asset(State(service): State<TileService>, Path(file_name): Path<String>) -> Response {
    if file_name.is_empty()
        || file_name.contains(['/', '\\'])
        || file_name.contains("..")
    {
        warn!("Rejected asset path");
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = service.asset_dir.join(&file_name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "Serving asset");
            ([(header::CONTENT_TYPE, content_type(&file_name))], bytes).into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Asset not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

fn content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Binds the configured address and serves until the process exits.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig, service: TileService) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "✅ Tile service ready at http://{}:{}{}",
        config.host(),
        config.port(),
        TILES_ROUTE
    );
    axum::serve(listener, service.router()).await?;
    Ok(())
}
