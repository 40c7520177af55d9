//! References to project assets that can be selected as a whole.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kinds of asset a clipboard item or favorite can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Tile,
    Prefab,
    /// A packaged group of tiles and prefabs
    Bundle,
    /// A layout that places bundles on several tilemaps at once
    TileFab,
}

impl AssetKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetKind::Tile => "Tile",
            AssetKind::Prefab => "Prefab",
            AssetKind::Bundle => "Bundle",
            AssetKind::TileFab => "TileFab",
        }
    }
}

/// Path-based reference to a project asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub path: String,
}

impl AssetRef {
    pub fn new(kind: AssetKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// File stem of the asset path
    pub fn name(&self) -> &str {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.path)
    }

    /// Where a rendered preview of this asset is expected
    pub fn preview_path(&self) -> String {
        format!("{}.preview.png", self.path)
    }

    pub fn is_valid(&self) -> bool {
        !self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_file_stem() {
        let asset = AssetRef::new(AssetKind::Prefab, "prefabs/house_small.prefab");
        assert_eq!(asset.name(), "house_small");
    }

    #[test]
    fn test_preview_path() {
        let asset = AssetRef::new(AssetKind::Prefab, "prefabs/tree.prefab");
        assert_eq!(asset.preview_path(), "prefabs/tree.prefab.preview.png");
    }

    #[test]
    fn test_empty_path_is_invalid() {
        assert!(!AssetRef::new(AssetKind::Bundle, "").is_valid());
        assert!(AssetRef::new(AssetKind::Bundle, "bundles/town.bundle").is_valid());
    }
}
