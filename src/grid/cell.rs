//! A single position within a multi-cell selection.

use bevy::prelude::*;

use crate::tiles::{same_tile, TileFlags, TileHandle};

/// Serialized form of a rich tile, kept so the cell can be rebuilt without
/// a live tile reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePayload {
    pub payload: String,
    pub type_name: String,
}

/// One grid position's tile, transform and tint.
///
/// `position` is relative to the owning grid's pivot.
#[derive(Debug, Clone)]
pub struct TileCell {
    tile: Option<TileHandle>,
    flags: TileFlags,
    pub position: IVec3,
    pub transform: Mat4,
    pub color: Color,
    pub payload: Option<TilePayload>,
}

impl TileCell {
    pub fn new(tile: Option<TileHandle>, position: IVec3, transform: Mat4, color: Color) -> Self {
        let flags = TileFlags::probe(tile.as_ref());
        Self {
            tile,
            flags,
            position,
            transform,
            color,
            payload: None,
        }
    }

    /// Cell with an identity transform and white tint
    pub fn with_tile(tile: TileHandle, position: IVec3) -> Self {
        Self::new(Some(tile), position, Mat4::IDENTITY, Color::WHITE)
    }

    /// Cell with no tile
    pub fn empty(position: IVec3) -> Self {
        Self::new(None, position, Mat4::IDENTITY, Color::WHITE)
    }

    pub fn tile(&self) -> Option<&TileHandle> {
        self.tile.as_ref()
    }

    /// Replace the tile and re-derive its flags. Any payload belonged to the
    /// old tile and is dropped.
    pub fn set_tile(&mut self, tile: Option<TileHandle>) {
        self.flags = TileFlags::probe(tile.as_ref());
        self.tile = tile;
        self.payload = None;
    }

    pub fn flags(&self) -> TileFlags {
        self.flags
    }

    pub fn is_rich(&self) -> bool {
        self.flags.is_rich()
    }

    pub fn is_base(&self) -> bool {
        self.flags.is_base()
    }

    pub fn is_plain(&self) -> bool {
        self.tile.is_some() && self.flags.is_plain()
    }

    /// Cell contributes to an icon: it has a tile with a sprite
    pub fn is_icon_eligible(&self) -> bool {
        self.tile.as_ref().is_some_and(|t| t.sprite().is_some())
    }
}

impl PartialEq for TileCell {
    fn eq(&self, other: &Self) -> bool {
        let (Some(a), Some(b)) = (&self.tile, &other.tile) else {
            return false;
        };
        same_tile(a, b)
            && self.position == other.position
            && self.transform == other.transform
            && self.color == other.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{PlainTile, RichTile, SpriteRef, SpriteTile};
    use std::sync::Arc;

    fn grass() -> TileHandle {
        Arc::new(SpriteTile::new("grass", Some(SpriteRef::whole("grass", 16, 16))))
    }

    #[test]
    fn test_equality_requires_tiles() {
        let a = TileCell::empty(IVec3::ZERO);
        let b = TileCell::empty(IVec3::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_is_structural() {
        let tile = grass();
        let a = TileCell::with_tile(tile.clone(), IVec3::new(1, 0, 0));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.color = Color::srgba(1.0, 0.0, 0.0, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_tile_rederives_flags() {
        let mut cell = TileCell::with_tile(grass(), IVec3::ZERO);
        assert!(cell.is_base());
        assert!(!cell.is_rich());

        cell.set_tile(Some(Arc::new(RichTile::new("torch", None))));
        assert!(cell.is_rich());

        cell.set_tile(Some(Arc::new(PlainTile::new("rule", None))));
        assert!(cell.is_plain());
        assert!(!cell.is_base());
    }

    #[test]
    fn test_icon_eligibility() {
        assert!(TileCell::with_tile(grass(), IVec3::ZERO).is_icon_eligible());
        assert!(!TileCell::empty(IVec3::ZERO).is_icon_eligible());
        let no_sprite: TileHandle = Arc::new(SpriteTile::new("blank", None));
        assert!(!TileCell::with_tile(no_sprite, IVec3::ZERO).is_icon_eligible());
    }
}
