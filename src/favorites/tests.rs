//! Unit tests for the favorites store.

use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;
use image::{Rgba, RgbaImage};

use super::*;
use crate::assets::{AssetDatabase, AssetKind, AssetRef, LocalAssetDatabase, PlaceholderIcon};
use crate::clipboard::{ClipboardItem, ClipboardSession, ItemIcon, ItemVariety, TilePick};
use crate::constants::MAX_FAVORITES;
use crate::grid::{GridBounds, TileCell};
use crate::tiles::{RichTile, SpriteRef, SpriteTile, Tile, TileHandle, TileLibrary};

fn asset_tile(name: &str) -> TileHandle {
    Arc::new(
        SpriteTile::new(name, Some(SpriteRef::whole(name, 8, 8)))
            .with_asset_path(format!("tiles/{}.tile", name)),
    )
}

fn database() -> LocalAssetDatabase {
    let mut db = LocalAssetDatabase::default();
    for (name, color) in [("grass", [0, 255, 0, 255]), ("stone", [90, 90, 90, 255])] {
        db.register_texture(name, RgbaImage::from_pixel(8, 8, Rgba(color)), false);
    }
    db
}

fn multi_at(session: &mut ClipboardSession, origin: IVec3, tiles: &[TileHandle]) -> ClipboardItem {
    let size = IVec3::new(tiles.len() as i32, 1, 1);
    let cells = tiles
        .iter()
        .enumerate()
        .map(|(i, t)| TileCell::with_tile(t.clone(), IVec3::new(i as i32, 0, 0)))
        .collect();
    ClipboardItem::from_cells(session, cells, GridBounds::new(origin, size), IVec3::ZERO)
}

fn prefab_ref(n: usize) -> AssetRef {
    AssetRef::new(AssetKind::Prefab, format!("prefabs/p{}.prefab", n))
}

// Adding and dedup

#[test]
fn test_add_prepends() {
    let mut store = FavoritesStore::new();
    store.add(Favorite::Asset(prefab_ref(1)));
    store.add(Favorite::Asset(prefab_ref(2)));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().name(), "p2");
}

#[test]
fn test_duplicate_moves_to_front() {
    let mut store = FavoritesStore::new();
    store.add(Favorite::Asset(prefab_ref(1)));
    store.add(Favorite::Asset(prefab_ref(2)));
    store.add(Favorite::Asset(prefab_ref(1)));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().name(), "p1");
    assert_eq!(store.get(1).unwrap().name(), "p2");
}

#[test]
fn test_tiles_dedup_by_handle_identity() {
    let mut store = FavoritesStore::new();
    let grass = asset_tile("grass");
    store.add(Favorite::Tile(grass.clone()));
    store.add(Favorite::Tile(grass));
    // Same name, different asset
    store.add(Favorite::Tile(asset_tile("grass")));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_store_is_capped() {
    let mut store = FavoritesStore::new();
    for n in 0..MAX_FAVORITES + 8 {
        store.add(Favorite::Asset(prefab_ref(n)));
    }
    assert_eq!(store.len(), MAX_FAVORITES);
    // Oldest entries fall off the end
    assert_eq!(store.get(0).unwrap().name(), format!("p{}", MAX_FAVORITES + 7));
}

#[test]
fn test_invalid_favorites_are_rejected() {
    let mut store = FavoritesStore::new();
    assert!(!store.add(Favorite::Asset(AssetRef::new(AssetKind::Bundle, ""))));
    assert!(!store.add(Favorite::Asset(AssetRef::new(AssetKind::Tile, "tiles/a.tile"))));
    assert!(store.is_empty());
}

#[test]
fn test_cell_bundles_dedup_by_shallow_key() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let placeholder = PlaceholderIcon::default();
    let mut store = FavoritesStore::new();

    let a = multi_at(&mut session, IVec3::ZERO, &[asset_tile("grass"), asset_tile("stone")]);
    // Different tiles, same bounds and count
    let b = multi_at(&mut session, IVec3::ZERO, &[asset_tile("stone"), asset_tile("stone")]);
    let c = multi_at(&mut session, IVec3::new(5, 0, 0), &[asset_tile("grass"), asset_tile("stone")]);

    store.add_clipboard_item(&a, &mut db, &placeholder).unwrap();
    store.add_clipboard_item(&b, &mut db, &placeholder).unwrap();
    assert_eq!(store.len(), 1);
    store.add_clipboard_item(&c, &mut db, &placeholder).unwrap();
    assert_eq!(store.len(), 2);
}

// Clipboard conversion

#[test]
fn test_add_clipboard_item_rejects_empty_and_invalid() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let placeholder = PlaceholderIcon::default();
    let mut store = FavoritesStore::new();

    let empty = ClipboardItem::empty(&mut session);
    assert!(matches!(
        store.add_clipboard_item(&empty, &mut db, &placeholder),
        Err(FavoritesError::EmptyItem)
    ));

    let no_cells = ClipboardItem::from_cells(&mut session, Vec::new(), GridBounds::default(), IVec3::ZERO);
    assert!(matches!(
        store.add_clipboard_item(&no_cells, &mut db, &placeholder),
        Err(FavoritesError::InvalidItem)
    ));
    assert!(store.is_empty());
}

#[test]
fn test_multi_cell_favorite_gets_icon_and_restores_textures() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let placeholder = PlaceholderIcon::default();
    let mut store = FavoritesStore::new();

    let item = multi_at(&mut session, IVec3::ZERO, &[asset_tile("grass"), asset_tile("stone")]);
    store.add_clipboard_item(&item, &mut db, &placeholder).unwrap();

    let Some(Favorite::Cells(bundle)) = store.get(0) else {
        panic!("expected a cell bundle");
    };
    assert!(matches!(bundle.icon, Some(ItemIcon::Image(_))));
    assert!(bundle.icon_png.is_some());

    assert_eq!(store.forced_textures().len(), 2);
    assert_eq!(db.is_readable("grass"), Some(true));
    assert_eq!(store.flush_forced_textures(&mut db), 2);
    assert_eq!(db.is_readable("grass"), Some(false));
    assert!(store.forced_textures().is_empty());
}

#[test]
fn test_multi_cell_without_sprites_fails_icon() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let mut store = FavoritesStore::new();
    let bare: TileHandle = Arc::new(SpriteTile::new("bare", None));
    let item = multi_at(&mut session, IVec3::ZERO, &[bare.clone(), bare]);

    let result = store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default());
    assert!(matches!(result, Err(FavoritesError::Icon(IconError::NoEligibleCells))));
}

#[test]
fn test_existing_icon_is_kept() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let mut store = FavoritesStore::new();
    let mut item = multi_at(&mut session, IVec3::ZERO, &[asset_tile("grass"), asset_tile("stone")]);
    let icon = ItemIcon::Image(Arc::new(RgbaImage::new(3, 3)));
    item.set_icon(icon.clone());

    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();
    let Some(Favorite::Cells(bundle)) = store.get(0) else {
        panic!("expected a cell bundle");
    };
    assert_eq!(bundle.icon, Some(icon));
    assert!(store.forced_textures().is_empty());
}

#[test]
fn test_to_clipboard_item_marks_origin() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let mut store = FavoritesStore::new();

    let tile_item = ClipboardItem::from_tile(
        &mut session,
        TilePick::from_map(asset_tile("grass"), IVec3::new(3, 3, 0), "Ground"),
    );
    store.add_clipboard_item(&tile_item, &mut db, &PlaceholderIcon::default()).unwrap();

    let picked = store.to_clipboard_item(0, &mut session).unwrap();
    assert!(picked.is_valid());
    assert!(picked.is_origin_favorites());
    assert_eq!(picked.variety(), ItemVariety::Tile);
    assert!(picked.tile_selection().unwrap().is_from_favorites());
    assert!(store.to_clipboard_item(5, &mut session).is_none());
}

#[test]
fn test_picked_cell_bundle_keeps_layout() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let mut store = FavoritesStore::new();
    let mut item = multi_at(&mut session, IVec3::ZERO, &[asset_tile("grass"), asset_tile("stone")]);
    item.rotate(false, true);

    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();
    let picked = store.to_clipboard_item(0, &mut session).unwrap();

    let (a, b) = (item.grid().unwrap(), picked.grid().unwrap());
    assert_eq!(a.cells(), b.cells());
    assert_eq!(a.local_bounds(), b.local_bounds());
    assert!(picked.icon().is_some());
}

#[test]
fn test_remove_and_clear() {
    let mut store = FavoritesStore::new();
    store.add(Favorite::Asset(prefab_ref(1)));
    store.add(Favorite::Asset(prefab_ref(2)));
    assert!(store.remove(7).is_none());
    assert_eq!(store.remove(0).unwrap().name(), "p2");
    store.clear();
    assert!(store.is_empty());
}

// Persistence

fn library_with(tiles: &[TileHandle]) -> TileLibrary {
    let mut library = TileLibrary::default();
    for tile in tiles {
        library.insert(tile.clone());
    }
    library
}

#[test]
fn test_saved_order_is_assets_then_bundles() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let grass = asset_tile("grass");
    let stone = asset_tile("stone");
    let mut store = FavoritesStore::new();

    let item = multi_at(&mut session, IVec3::ZERO, &[grass.clone(), stone.clone()]);
    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();
    store.add(Favorite::Asset(prefab_ref(1)));
    store.add(Favorite::Tile(grass.clone()));

    let saved = store.to_saved();
    assert_eq!(saved.assets.len(), 2);
    assert_eq!(saved.assets[0], AssetRef::new(AssetKind::Tile, "tiles/grass.tile"));
    assert_eq!(saved.bundles.len(), 1);

    let restored = FavoritesStore::from_saved(&saved, &library_with(&[grass, stone]));
    assert_eq!(restored.len(), 3);
    assert!(matches!(restored.get(0), Some(Favorite::Tile(_))));
    assert!(matches!(restored.get(1), Some(Favorite::Asset(_))));
    assert!(matches!(restored.get(2), Some(Favorite::Cells(_))));
}

fn sparse_at(session: &mut ClipboardSession, origin: IVec3, tiles: &[Option<TileHandle>]) -> ClipboardItem {
    let size = IVec3::new(tiles.len() as i32, 1, 1);
    let cells = tiles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let position = IVec3::new(i as i32, 0, 0);
            match t {
                Some(tile) => TileCell::with_tile(tile.clone(), position),
                None => TileCell::empty(position),
            }
        })
        .collect();
    ClipboardItem::from_cells(session, cells, GridBounds::new(origin, size), IVec3::ZERO)
}

#[test]
fn test_save_and_load_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = LocalAssetDatabase::new(dir.path());
    db.register_texture("grass", RgbaImage::from_pixel(8, 8, Rgba([0, 255, 0, 255])), true);

    let mut session = ClipboardSession::new();
    let grass = asset_tile("grass");
    let door: TileHandle = Arc::new(RichTile::new("door", Some(SpriteRef::whole("grass", 8, 8))));
    let mut store = FavoritesStore::new();
    let item = multi_at(&mut session, IVec3::new(2, 2, 0), &[grass.clone(), door]);
    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();
    let sparse = sparse_at(
        &mut session,
        IVec3::new(0, 5, 0),
        &[Some(grass.clone()), None, Some(grass.clone())],
    );
    store.add_clipboard_item(&sparse, &mut db, &PlaceholderIcon::default()).unwrap();
    store.add(Favorite::Asset(AssetRef::new(AssetKind::Bundle, "bundles/town.bundle")));

    let path = Path::new("favorites.json");
    store.save(&mut db, path).unwrap();

    let loaded = FavoritesStore::load(&db, path, &library_with(&[grass])).unwrap();
    assert_eq!(loaded.len(), 3);

    let Some(Favorite::Cells(holes)) = loaded.get(1) else {
        panic!("expected the sparse cell bundle");
    };
    assert_eq!(holes.cells.len(), 3);
    assert!(holes.cells[1].tile().is_none());
    assert_eq!(holes.cells[1].position, IVec3::new(1, 0, 0));

    let Some(Favorite::Cells(bundle)) = loaded.get(2) else {
        panic!("expected a cell bundle");
    };
    assert_eq!(bundle.cells.len(), 2);
    assert_eq!(bundle.selection_bounds.position, IVec3::new(2, 2, 0));
    // The rich tile came back from its payload
    assert!(bundle.cells.iter().any(|c| c.is_rich() && c.tile().unwrap().name() == "door"));
    assert!(matches!(bundle.icon, Some(ItemIcon::Image(_))));

    // Both bundles are still paintable and rotate as a block
    for index in [1, 2] {
        let mut picked = loaded.to_clipboard_item(index, &mut session).unwrap();
        assert!(picked.is_valid());
        assert!(!picked.grid().unwrap().is_invalid());
        assert!(picked.rotate(false, true).changed());
    }
}

#[test]
fn test_sparse_bundle_keeps_dedup_key_after_reload() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let grass = asset_tile("grass");
    let mut store = FavoritesStore::new();
    let sparse = sparse_at(&mut session, IVec3::ZERO, &[Some(grass.clone()), None, Some(grass.clone())]);
    store.add_clipboard_item(&sparse, &mut db, &PlaceholderIcon::default()).unwrap();

    let mut restored = FavoritesStore::from_saved(&store.to_saved(), &library_with(&[grass]));
    assert_eq!(restored.len(), 1);

    // Adding the same selection again replaces the reloaded entry
    restored.add_clipboard_item(&sparse, &mut db, &PlaceholderIcon::default()).unwrap();
    assert_eq!(restored.len(), 1);
}

#[test]
fn test_re_added_favorite_keeps_icon_through_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = LocalAssetDatabase::new(dir.path());
    db.register_texture("grass", RgbaImage::from_pixel(8, 8, Rgba([0, 255, 0, 255])), true);
    db.register_texture("stone", RgbaImage::from_pixel(8, 8, Rgba([90, 90, 90, 255])), true);

    let mut session = ClipboardSession::new();
    let (grass, stone) = (asset_tile("grass"), asset_tile("stone"));
    let mut store = FavoritesStore::new();
    let item = multi_at(&mut session, IVec3::ZERO, &[grass.clone(), stone.clone()]);
    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();

    let picked = store.to_clipboard_item(0, &mut session).unwrap();
    assert!(matches!(picked.icon(), Some(ItemIcon::Image(_))));
    store.add_clipboard_item(&picked, &mut db, &PlaceholderIcon::default()).unwrap();
    assert_eq!(store.len(), 1);

    let path = Path::new("favorites.json");
    store.save(&mut db, path).unwrap();
    let loaded = FavoritesStore::load(&db, path, &library_with(&[grass, stone])).unwrap();
    let Some(Favorite::Cells(bundle)) = loaded.get(0) else {
        panic!("expected a cell bundle");
    };
    assert!(bundle.icon_png.is_some());
    assert!(matches!(bundle.icon, Some(ItemIcon::Image(_))));
}

#[test]
fn test_pathless_tile_favorite_saved_by_payload() {
    let door: TileHandle = Arc::new(RichTile::new("door", None).with_tags(&["wood"]));
    let mut store = FavoritesStore::new();
    store.add(Favorite::Tile(door));
    store.add(Favorite::Asset(prefab_ref(1)));

    let saved = store.to_saved();
    assert_eq!(saved.assets.len(), 1);
    assert_eq!(saved.tiles.len(), 1);

    let restored = FavoritesStore::from_saved(&saved, &TileLibrary::default());
    assert_eq!(restored.len(), 2);
    assert!(matches!(restored.get(0), Some(Favorite::Asset(_))));
    assert_eq!(restored.get(1).unwrap().name(), "door");
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = LocalAssetDatabase::new(dir.path());
    let loaded = FavoritesStore::load(&db, Path::new("none.json"), &TileLibrary::default()).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn test_load_corrupt_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = LocalAssetDatabase::new(dir.path());
    db.create_asset(Path::new("bad.json"), "{ nope").unwrap();
    let result = FavoritesStore::load(&db, Path::new("bad.json"), &TileLibrary::default());
    assert!(matches!(result, Err(FavoritesError::Parse(_))));
}

#[test]
fn test_unresolved_bundle_is_dropped_on_load() {
    let mut session = ClipboardSession::new();
    let mut db = database();
    let mut store = FavoritesStore::new();
    let item = multi_at(&mut session, IVec3::ZERO, &[asset_tile("grass"), asset_tile("stone")]);
    store.add_clipboard_item(&item, &mut db, &PlaceholderIcon::default()).unwrap();

    // Nothing registered: every cell comes back empty and the bundle is dropped
    let restored = FavoritesStore::from_saved(&store.to_saved(), &TileLibrary::default());
    assert!(restored.is_empty());
}
