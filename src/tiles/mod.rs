//! Tile model: the capability probe every paintable tile answers to.
//!
//! Tiles are shared, immutable assets referenced through [`TileHandle`].
//! Cells and clipboard items never inspect a concrete tile type; they ask
//! the tile for its [`TileCapabilities`] once and cache the answer.
//!
//! ## Module Structure
//!
//! - [`kinds`] - Concrete tile types (plain, sprite, rich)
//! - [`library`] - Asset-path lookup and rich-tile reconstruction

mod kinds;
mod library;

pub use kinds::{PlainTile, RichTile, SpriteTile};
pub use library::{TileLibrary, TileLibraryError};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared reference to a tile asset
pub type TileHandle = Arc<dyn Tile>;

/// A rectangular region of a texture used as a tile's sprite
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteRef {
    /// Texture id as registered in the asset database
    pub texture: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRef {
    /// Sprite covering a whole `width`x`height` texture
    pub fn whole(texture: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            texture: texture.into(),
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// What a tile can do, as reported by the tile itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCapabilities {
    /// Tile carries its own state and can be serialized to a payload
    pub is_rich: bool,
    /// Tile has a sprite, color and transform
    pub is_base: bool,
    pub lock_color: bool,
    pub lock_transform: bool,
    /// Tile is a per-position clone of a project asset
    pub is_clone: bool,
}

/// Capability flags derived from a tile.
///
/// Only constructed through [`TileFlags::probe`] so the flags can't drift
/// from the tile they were derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileFlags {
    capabilities: TileCapabilities,
}

impl TileFlags {
    pub fn probe(tile: Option<&TileHandle>) -> Self {
        Self {
            capabilities: tile.map(|t| t.capabilities()).unwrap_or_default(),
        }
    }

    pub fn is_rich(&self) -> bool {
        self.capabilities.is_rich
    }

    pub fn is_base(&self) -> bool {
        self.capabilities.is_base
    }

    /// Neither a base tile nor a rich tile: no sprite, color or transform
    pub fn is_plain(&self) -> bool {
        !self.capabilities.is_base && !self.capabilities.is_rich
    }

    pub fn lock_color(&self) -> bool {
        self.capabilities.lock_color
    }

    pub fn lock_transform(&self) -> bool {
        self.capabilities.lock_transform
    }

    pub fn is_clone(&self) -> bool {
        self.capabilities.is_clone
    }

    /// Whether the tile has a transform and color that can be edited
    pub fn has_transform(&self) -> bool {
        !self.is_plain()
    }
}

/// Capability probe implemented by every tile type.
pub trait Tile: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Concrete type name, used to tag serialized payloads
    fn type_name(&self) -> &'static str;

    fn capabilities(&self) -> TileCapabilities;

    /// Sprite the tile would render with, if any
    fn sprite(&self) -> Option<&SpriteRef>;

    /// Project asset path, when the tile is a referenceable asset
    fn asset_path(&self) -> Option<&str> {
        None
    }

    /// Portable text form of the tile. Only rich tiles provide one.
    fn to_payload(&self) -> Option<Result<String, serde_json::Error>> {
        None
    }
}

/// Two handles refer to the same tile asset
pub fn same_tile(a: &TileHandle, b: &TileHandle) -> bool {
    Arc::ptr_eq(a, b)
}
