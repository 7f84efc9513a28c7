//! Tile descriptors and the board that holds them.

use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One tile as delivered by the tile service.
///
/// Immutable once fetched. The JSON form is
/// `{"tile_number": 3, "file_name": "http://.../tile_image_3.png"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, new)]
#[display("#{} ({})", tile_number, file_name)]
pub struct TileDescriptor {
    /// Identity used by the pairing rule.
    pub tile_number: i64,
    /// Image reference for the tile face (URL or path).
    #[new(into)]
    pub file_name: String,
}

/// Ordered tiles for one game session.
///
/// The order is fixed once the board is built; a reset replaces the
/// whole board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<TileDescriptor>,
}

impl Board {
    /// Creates a board from already-ordered tiles.
    pub fn new(tiles: Vec<TileDescriptor>) -> Self {
        Self { tiles }
    }

    /// Number of tiles on the board.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true when the board holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Gets the tile at `index`.
    pub fn get(&self, index: usize) -> Option<&TileDescriptor> {
        self.tiles.get(index)
    }

    /// All tiles in board order.
    pub fn tiles(&self) -> &[TileDescriptor] {
        &self.tiles
    }
}

impl From<Vec<TileDescriptor>> for Board {
    fn from(tiles: Vec<TileDescriptor>) -> Self {
        Self::new(tiles)
    }
}
