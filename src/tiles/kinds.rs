//! Concrete tile types.

use serde::{Deserialize, Serialize};

use super::{SpriteRef, Tile, TileCapabilities};

/// A tile that only exists as a rule or script: no sprite, color or transform
#[derive(Debug, Clone)]
pub struct PlainTile {
    pub name: String,
    pub asset_path: Option<String>,
}

impl PlainTile {
    pub fn new(name: impl Into<String>, asset_path: Option<String>) -> Self {
        Self {
            name: name.into(),
            asset_path,
        }
    }
}

impl Tile for PlainTile {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "PlainTile"
    }

    fn capabilities(&self) -> TileCapabilities {
        TileCapabilities::default()
    }

    fn sprite(&self) -> Option<&SpriteRef> {
        None
    }

    fn asset_path(&self) -> Option<&str> {
        self.asset_path.as_deref()
    }
}

/// A regular sprite tile
#[derive(Debug, Clone)]
pub struct SpriteTile {
    pub name: String,
    pub asset_path: Option<String>,
    pub sprite: Option<SpriteRef>,
}

impl SpriteTile {
    pub fn new(name: impl Into<String>, sprite: Option<SpriteRef>) -> Self {
        Self {
            name: name.into(),
            asset_path: None,
            sprite,
        }
    }

    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }
}

impl Tile for SpriteTile {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "SpriteTile"
    }

    fn capabilities(&self) -> TileCapabilities {
        TileCapabilities {
            is_base: true,
            ..Default::default()
        }
    }

    fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    fn asset_path(&self) -> Option<&str> {
        self.asset_path.as_deref()
    }
}

/// A tile with its own state (locks, tags, custom data).
///
/// Rich tiles placed in a scene are usually per-position clones, so they
/// are persisted by value instead of by asset path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTile {
    pub name: String,
    #[serde(default)]
    pub sprite: Option<SpriteRef>,
    #[serde(default)]
    pub lock_color: bool,
    #[serde(default)]
    pub lock_transform: bool,
    #[serde(default)]
    pub is_clone: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub custom_data: serde_json::Value,
}

impl RichTile {
    pub const TYPE_NAME: &'static str = "RichTile";

    pub fn new(name: impl Into<String>, sprite: Option<SpriteRef>) -> Self {
        Self {
            name: name.into(),
            sprite,
            lock_color: false,
            lock_transform: false,
            is_clone: false,
            tags: Vec::new(),
            custom_data: serde_json::Value::Null,
        }
    }

    pub fn with_locks(mut self, lock_color: bool, lock_transform: bool) -> Self {
        self.lock_color = lock_color;
        self.lock_transform = lock_transform;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl Tile for RichTile {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn capabilities(&self) -> TileCapabilities {
        TileCapabilities {
            is_rich: true,
            is_base: true,
            lock_color: self.lock_color,
            lock_transform: self.lock_transform,
            is_clone: self.is_clone,
        }
    }

    fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    fn to_payload(&self) -> Option<Result<String, serde_json::Error>> {
        Some(serde_json::to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tile_has_no_capabilities() {
        let tile = PlainTile::new("water rule", Some("tiles/water.rule".to_string()));
        assert_eq!(tile.capabilities(), TileCapabilities::default());
        assert!(tile.sprite().is_none());
        assert_eq!(tile.asset_path(), Some("tiles/water.rule"));
        assert!(tile.to_payload().is_none());
    }

    #[test]
    fn test_sprite_tile_is_base() {
        let tile = SpriteTile::new("grass", Some(SpriteRef::whole("grass", 16, 16)));
        let caps = tile.capabilities();
        assert!(caps.is_base);
        assert!(!caps.is_rich);
    }

    #[test]
    fn test_rich_tile_payload_roundtrip() {
        let tile = RichTile::new("chest", Some(SpriteRef::whole("chest", 16, 16)))
            .with_locks(false, true)
            .with_tags(&["loot", "interactive"]);

        let payload = tile.to_payload().unwrap().unwrap();
        let restored: RichTile = serde_json::from_str(&payload).unwrap();
        assert_eq!(restored, tile);
    }
}
