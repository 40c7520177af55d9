//! The favorites list: most recent first, deduplicated, capped.

use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::assets::{decode_png, encode_png, AssetDatabase, AssetError, AssetKind, AssetRef, PlaceholderIcon};
use crate::clipboard::{ClipboardContent, ClipboardItem, ClipboardSession, ItemIcon};
use crate::constants::MAX_FAVORITES;
use crate::grid::{CellGrid, GridBounds, TileCell};
use crate::tiles::{same_tile, Tile, TileHandle, TileLibrary};

use super::icon::{synthesize_icon, IconError};
use super::saved::{SavedCell, SavedCellBundle, SavedFavorites, SavedTileRef};

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("clipboard item is not valid")]
    InvalidItem,
    #[error("an empty clipboard item can't be a favorite")]
    EmptyItem,
    #[error("icon synthesis failed: {0}")]
    Icon(#[from] IconError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to serialize favorites: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("favorites file is corrupted: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Multi-cell favorite
#[derive(Debug, Clone)]
pub struct CellBundle {
    pub cells: Vec<TileCell>,
    pub local_bounds: GridBounds,
    pub selection_bounds: GridBounds,
    pub pivot: IVec3,
    pub icon: Option<ItemIcon>,
    /// PNG of a synthesized icon, kept for saving and export
    pub icon_png: Option<Vec<u8>>,
}

impl CellBundle {
    pub fn from_grid(grid: &CellGrid) -> Self {
        Self {
            cells: grid.cells().to_vec(),
            local_bounds: grid.local_bounds(),
            selection_bounds: grid.selection_bounds(),
            pivot: grid.pivot(),
            icon: None,
            icon_png: None,
        }
    }

    /// Shallow identity used for deduplication
    fn key(&self) -> (GridBounds, GridBounds, usize) {
        (self.selection_bounds, self.local_bounds, self.cells.len())
    }

    fn to_saved(&self) -> SavedCellBundle {
        let icon_sprite = match &self.icon {
            Some(ItemIcon::Sprite(sprite)) => Some(sprite.clone()),
            _ => None,
        };
        SavedCellBundle {
            cells: self.cells.iter().map(SavedCell::from_cell).collect(),
            local_bounds: self.local_bounds.into(),
            selection_bounds: self.selection_bounds.into(),
            pivot: self.pivot.to_array(),
            icon_png: self.icon_png.clone(),
            icon_sprite,
        }
    }

    fn from_saved(saved: &SavedCellBundle, library: &TileLibrary) -> Self {
        let cells = saved.cells.iter().map(|c| c.to_cell(library)).collect();

        let decoded = saved.icon_png.as_ref().and_then(|bytes| match decode_png(bytes) {
            Ok(image) => Some(ItemIcon::Image(Arc::new(image))),
            Err(e) => {
                warn!("Favorite icon could not be decoded: {}", e);
                None
            }
        });
        let icon = decoded.or_else(|| saved.icon_sprite.clone().map(ItemIcon::Sprite));

        Self {
            cells,
            local_bounds: saved.local_bounds.into(),
            selection_bounds: saved.selection_bounds.into(),
            pivot: IVec3::from_array(saved.pivot),
            icon,
            icon_png: saved.icon_png.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Favorite {
    Tile(TileHandle),
    /// Prefab, bundle or tile-fab
    Asset(AssetRef),
    Cells(CellBundle),
}

impl Favorite {
    pub fn is_valid(&self) -> bool {
        match self {
            Favorite::Tile(_) => true,
            Favorite::Asset(asset) => asset.kind != AssetKind::Tile && asset.is_valid(),
            Favorite::Cells(bundle) => bundle.cells.iter().any(|c| c.tile().is_some()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Favorite::Tile(tile) => tile.name().to_string(),
            Favorite::Asset(asset) => asset.name().to_string(),
            Favorite::Cells(bundle) => format!("Multiple tiles ({})", bundle.cells.len()),
        }
    }

    fn same_as(&self, other: &Favorite) -> bool {
        match (self, other) {
            (Favorite::Tile(a), Favorite::Tile(b)) => same_tile(a, b),
            (Favorite::Asset(a), Favorite::Asset(b)) => a == b,
            (Favorite::Cells(a), Favorite::Cells(b)) => a.key() == b.key(),
            _ => false,
        }
    }
}

/// Resource holding the favorites list
#[derive(Resource, Debug, Default)]
pub struct FavoritesStore {
    entries: Vec<Favorite>,
    /// Textures made readable for icon synthesis, restored by
    /// [`FavoritesStore::flush_forced_textures`]
    forced_readable: Vec<String>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Favorite] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Favorite> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn forced_textures(&self) -> &[String] {
        &self.forced_readable
    }

    /// Put a favorite at the front of the list. Returns false if it was
    /// invalid and dropped.
    pub fn add(&mut self, favorite: Favorite) -> bool {
        if !favorite.is_valid() {
            warn!("Ignoring invalid favorite '{}'", favorite.name());
            return false;
        }
        self.entries.insert(0, favorite);
        self.dedup();
        true
    }

    /// Convert a clipboard item into a favorite and add it. Multi-cell
    /// items without an icon get one synthesized.
    pub fn add_clipboard_item(
        &mut self,
        item: &ClipboardItem,
        database: &mut dyn AssetDatabase,
        placeholder: &PlaceholderIcon,
    ) -> Result<(), FavoritesError> {
        if !item.is_valid() {
            return Err(match item.content() {
                ClipboardContent::Empty => FavoritesError::EmptyItem,
                _ => FavoritesError::InvalidItem,
            });
        }

        let favorite = match item.content() {
            ClipboardContent::Empty => return Err(FavoritesError::EmptyItem),
            ClipboardContent::Tile(selection) => match selection.tile() {
                Some(tile) => Favorite::Tile(tile.clone()),
                None => return Err(FavoritesError::InvalidItem),
            },
            ClipboardContent::Bundle(asset) | ClipboardContent::TileFab(asset) => {
                Favorite::Asset(asset.clone())
            }
            ClipboardContent::Prefab(selection) => Favorite::Asset(selection.asset.clone()),
            ClipboardContent::MultipleTiles(selection) => {
                let mut bundle = CellBundle::from_grid(&selection.grid);
                match &selection.icon {
                    Some(icon) => {
                        if let ItemIcon::Image(image) = icon {
                            bundle.icon_png = match encode_png(image) {
                                Ok(png) => Some(png),
                                Err(e) => {
                                    warn!("Could not encode favorite icon: {}", e);
                                    None
                                }
                            };
                        }
                        bundle.icon = Some(icon.clone());
                    }
                    None => {
                        let icon = synthesize_icon(
                            &selection.grid,
                            database,
                            placeholder,
                            &mut self.forced_readable,
                        )?;
                        bundle.icon = Some(icon.icon);
                        bundle.icon_png = icon.png;
                    }
                }
                Favorite::Cells(bundle)
            }
        };

        info!("Added '{}' to favorites", favorite.name());
        self.add(favorite);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Favorite> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop invalid entries and later duplicates, then trim to the cap
    pub fn dedup(&mut self) {
        let mut kept: Vec<Favorite> = Vec::with_capacity(self.entries.len());
        for favorite in self.entries.drain(..) {
            if favorite.is_valid() && !kept.iter().any(|k| k.same_as(&favorite)) {
                kept.push(favorite);
            }
        }
        kept.truncate(MAX_FAVORITES);
        self.entries = kept;
    }

    /// Fresh clipboard item for the favorite at `index`
    pub fn to_clipboard_item(&self, index: usize, session: &mut ClipboardSession) -> Option<ClipboardItem> {
        let item = match self.entries.get(index)? {
            Favorite::Tile(tile) => ClipboardItem::from_favorite_tile(session, tile.clone()),
            Favorite::Asset(asset) => match asset.kind {
                AssetKind::Bundle => ClipboardItem::from_bundle(session, Some(asset.clone())),
                AssetKind::TileFab => ClipboardItem::from_tilefab(session, Some(asset.clone())),
                AssetKind::Prefab => {
                    ClipboardItem::from_prefab(session, Some(asset.clone()), Mat4::IDENTITY)
                }
                AssetKind::Tile => return None,
            },
            Favorite::Cells(bundle) => {
                let mut item = ClipboardItem::from_cells(
                    session,
                    bundle.cells.clone(),
                    bundle.selection_bounds,
                    bundle.pivot,
                );
                if let Some(icon) = &bundle.icon {
                    item.set_icon(icon.clone());
                }
                item
            }
        };
        Some(item.from_favorites())
    }

    pub fn to_saved(&self) -> SavedFavorites {
        let mut saved = SavedFavorites::default();
        for favorite in &self.entries {
            match favorite {
                Favorite::Tile(tile) => match SavedTileRef::from_tile(tile, false) {
                    Some(SavedTileRef::Asset { path }) => {
                        saved.assets.push(AssetRef::new(AssetKind::Tile, path))
                    }
                    Some(by_value) => saved.tiles.push(by_value),
                    None => {}
                },
                Favorite::Asset(asset) => saved.assets.push(asset.clone()),
                Favorite::Cells(bundle) => saved.bundles.push(bundle.to_saved()),
            }
        }
        saved
    }

    /// Rebuild a store from its saved form: asset favorites first, then
    /// tiles stored by value, then cell bundles, each in saved order
    pub fn from_saved(saved: &SavedFavorites, library: &TileLibrary) -> Self {
        let mut store = Self::new();
        for asset in &saved.assets {
            let favorite = if asset.kind == AssetKind::Tile {
                match library.resolve(&asset.path) {
                    Ok(tile) => Favorite::Tile(tile),
                    Err(e) => {
                        warn!("Dropping favorite tile: {}", e);
                        continue;
                    }
                }
            } else {
                Favorite::Asset(asset.clone())
            };
            store.entries.push(favorite);
        }
        for tile in &saved.tiles {
            match tile.resolve(library) {
                Ok(tile) => store.entries.push(Favorite::Tile(tile)),
                Err(e) => warn!("Dropping favorite tile: {}", e),
            }
        }
        for bundle in &saved.bundles {
            store
                .entries
                .push(Favorite::Cells(CellBundle::from_saved(bundle, library)));
        }
        store.dedup();
        store
    }

    pub fn save(&self, database: &mut dyn AssetDatabase, path: &Path) -> Result<(), FavoritesError> {
        let json = serde_json::to_string_pretty(&self.to_saved()).map_err(FavoritesError::Serialize)?;
        database.create_asset(path, &json)?;
        info!("Saved {} favorites to {:?}", self.entries.len(), path);
        Ok(())
    }

    /// Load favorites; a missing file gives an empty store
    pub fn load(
        database: &dyn AssetDatabase,
        path: &Path,
        library: &TileLibrary,
    ) -> Result<Self, FavoritesError> {
        let Some(json) = database.load_asset(path)? else {
            info!("No favorites file at {:?}", path);
            return Ok(Self::new());
        };
        let saved: SavedFavorites = serde_json::from_str(&json).map_err(FavoritesError::Parse)?;
        let store = Self::from_saved(&saved, library);
        info!("Loaded {} favorites from {:?}", store.len(), path);
        Ok(store)
    }

    /// Restore textures forced readable during icon synthesis. Returns how
    /// many were restored.
    pub fn flush_forced_textures(&mut self, database: &mut dyn AssetDatabase) -> usize {
        let mut restored = 0;
        for texture in self.forced_readable.drain(..) {
            match database.set_readable(&texture, false) {
                Ok(()) => restored += 1,
                Err(e) => warn!("Could not restore '{}' to unreadable: {}", texture, e),
            }
        }
        restored
    }
}
