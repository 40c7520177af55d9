//! Tile lookup by asset path and reconstruction of rich tiles from payloads.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use super::{RichTile, TileHandle};

#[derive(Debug, Error)]
pub enum TileLibraryError {
    #[error("no tile registered at asset path '{0}'")]
    UnknownAsset(String),
    #[error("no deserializer registered for tile type '{0}'")]
    UnknownType(String),
    #[error("failed to decode {type_name} payload: {source}")]
    Payload {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
}

type PayloadLoader = fn(&str) -> Result<TileHandle, serde_json::Error>;

fn load_rich_tile(payload: &str) -> Result<TileHandle, serde_json::Error> {
    let tile: RichTile = serde_json::from_str(payload)?;
    Ok(Arc::new(tile))
}

/// Resource resolving persisted tile references back to live handles
#[derive(Resource)]
pub struct TileLibrary {
    tiles: HashMap<String, TileHandle>,
    loaders: HashMap<String, PayloadLoader>,
}

impl Default for TileLibrary {
    fn default() -> Self {
        let mut library = Self {
            tiles: HashMap::new(),
            loaders: HashMap::new(),
        };
        library.register_type(RichTile::TYPE_NAME, load_rich_tile);
        library
    }
}

impl TileLibrary {
    /// Register a tile asset. Tiles without an asset path can't be
    /// referenced and are ignored.
    pub fn insert(&mut self, tile: TileHandle) -> bool {
        let Some(path) = tile.asset_path().map(str::to_string) else {
            warn!("Tile '{}' has no asset path, not added to library", tile.name());
            return false;
        };
        self.tiles.insert(path, tile);
        true
    }

    pub fn get(&self, asset_path: &str) -> Option<&TileHandle> {
        self.tiles.get(asset_path)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Register a payload loader for a rich tile type name
    pub fn register_type(&mut self, type_name: &str, loader: PayloadLoader) {
        self.loaders.insert(type_name.to_string(), loader);
    }

    pub fn resolve(&self, asset_path: &str) -> Result<TileHandle, TileLibraryError> {
        self.tiles
            .get(asset_path)
            .cloned()
            .ok_or_else(|| TileLibraryError::UnknownAsset(asset_path.to_string()))
    }

    /// Rebuild a tile from its serialized payload
    pub fn reconstruct(&self, type_name: &str, payload: &str) -> Result<TileHandle, TileLibraryError> {
        let loader = self
            .loaders
            .get(type_name)
            .ok_or_else(|| TileLibraryError::UnknownType(type_name.to_string()))?;
        loader(payload).map_err(|source| TileLibraryError::Payload {
            type_name: type_name.to_string(),
            source,
        })
    }
}
