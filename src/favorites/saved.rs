//! Serialized form of the favorites list.
//!
//! Ordered lists of direct asset references, tiles stored by value and cell
//! bundles. Rich tiles in bundles, and favorite tiles without an asset path,
//! are stored by payload so they can be rebuilt through the
//! [`TileLibrary`](crate::tiles::TileLibrary) without a live reference;
//! everything else is referenced by asset path.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::AssetRef;
use crate::grid::{SavedBounds, TileCell, TilePayload};
use crate::tiles::{SpriteRef, Tile, TileHandle, TileLibrary, TileLibraryError};

pub const FAVORITES_FORMAT_VERSION: u32 = 1;

/// Root of the favorites file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFavorites {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
    /// Favorite tiles with no asset path, stored by payload
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<SavedTileRef>,
    #[serde(default)]
    pub bundles: Vec<SavedCellBundle>,
}

impl Default for SavedFavorites {
    fn default() -> Self {
        Self {
            version: FAVORITES_FORMAT_VERSION,
            assets: Vec::new(),
            tiles: Vec::new(),
            bundles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCellBundle {
    pub cells: Vec<SavedCell>,
    pub local_bounds: SavedBounds,
    pub selection_bounds: SavedBounds,
    #[serde(default)]
    pub pivot: [i32; 3],
    /// PNG bytes of a synthesized icon
    #[serde(default)]
    pub icon_png: Option<Vec<u8>>,
    #[serde(default)]
    pub icon_sprite: Option<SpriteRef>,
}

/// How a saved cell refers to its tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum SavedTileRef {
    Asset { path: String },
    Payload { type_name: String, payload: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCell {
    pub tile: Option<SavedTileRef>,
    pub position: [i32; 3],
    pub transform: [f32; 16],
    pub color: [f32; 4],
}

pub fn color_to_array(color: Color) -> [f32; 4] {
    let srgba = color.to_srgba();
    [srgba.red, srgba.green, srgba.blue, srgba.alpha]
}

pub fn array_to_color(arr: [f32; 4]) -> Color {
    Color::srgba(arr[0], arr[1], arr[2], arr[3])
}

impl SavedTileRef {
    /// Payload for rich tiles when `prefer_payload`, otherwise the asset
    /// path, falling back to the payload. `None` when the tile has neither.
    pub fn from_tile(tile: &TileHandle, prefer_payload: bool) -> Option<Self> {
        let by_payload = || match tile.to_payload() {
            Some(Ok(payload)) => Some(SavedTileRef::Payload {
                type_name: tile.type_name().to_string(),
                payload,
            }),
            Some(Err(e)) => {
                warn!("Failed to serialize rich tile '{}': {}", tile.name(), e);
                None
            }
            None => None,
        };
        let by_path = || {
            tile.asset_path().map(|path| SavedTileRef::Asset {
                path: path.to_string(),
            })
        };

        let saved = if prefer_payload {
            by_payload().or_else(by_path)
        } else {
            by_path().or_else(by_payload)
        };
        if saved.is_none() {
            warn!("Tile '{}' has no asset path or payload and can't be saved", tile.name());
        }
        saved
    }

    pub fn resolve(&self, library: &TileLibrary) -> Result<TileHandle, TileLibraryError> {
        match self {
            SavedTileRef::Asset { path } => library.resolve(path),
            SavedTileRef::Payload { type_name, payload } => library.reconstruct(type_name, payload),
        }
    }

    fn payload(&self) -> Option<TilePayload> {
        match self {
            SavedTileRef::Asset { .. } => None,
            SavedTileRef::Payload { type_name, payload } => Some(TilePayload {
                payload: payload.clone(),
                type_name: type_name.clone(),
            }),
        }
    }
}

impl SavedCell {
    /// Rich tiles are stored by payload, other tiles by asset path. A tile
    /// with neither is saved as an empty cell.
    pub fn from_cell(cell: &TileCell) -> Self {
        Self {
            tile: cell
                .tile()
                .and_then(|tile| SavedTileRef::from_tile(tile, cell.is_rich())),
            position: cell.position.to_array(),
            transform: cell.transform.to_cols_array(),
            color: color_to_array(cell.color),
        }
    }

    /// Rebuild the cell. A tile that can't be resolved leaves an empty cell
    /// so the selection keeps its shape.
    pub fn to_cell(&self, library: &TileLibrary) -> TileCell {
        let position = IVec3::from_array(self.position);
        let (tile, payload) = match &self.tile {
            None => (None, None),
            Some(saved) => match saved.resolve(library) {
                Ok(tile) => (Some(tile), saved.payload()),
                Err(e) => {
                    warn!("Favorite cell at {:?} left empty: {}", position, e);
                    (None, None)
                }
            },
        };

        let mut cell = TileCell::new(
            tile,
            position,
            Mat4::from_cols_array(&self.transform),
            array_to_color(self.color),
        );
        cell.payload = payload;
        cell
    }
}
