//! The clipboard item: what the user currently has selected to paint.

use std::sync::Arc;

use bevy::prelude::*;
use image::RgbaImage;
use uuid::Uuid;

use crate::assets::{AssetKind, AssetRef};
use crate::constants::IMPOSSIBLE_POSITION;
use crate::grid::{CellGrid, FlipAxis, GridBounds, RotationDirection, TileCell};
use crate::tiles::{SpriteRef, Tile, TileFlags, TileHandle};

use super::session::ClipboardSession;

/// Which edits an apply call is allowed to make
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyFlags {
    pub transform: bool,
    pub color: bool,
}

impl ApplyFlags {
    pub const NONE: Self = Self {
        transform: false,
        color: false,
    };
    pub const TRANSFORM: Self = Self {
        transform: true,
        color: false,
    };
    pub const COLOR: Self = Self {
        transform: false,
        color: true,
    };
    pub const ALL: Self = Self {
        transform: true,
        color: true,
    };
}

/// Result of a mutation on a clipboard item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The item can't take this edit; nothing changed
    Unchanged,
    Applied,
    /// Applied, but some affected tile asked not to be edited this way
    AppliedWithLockWarning,
}

impl MutationOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, MutationOutcome::Unchanged)
    }
}

/// Variant tag of a clipboard item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemVariety {
    Tile,
    Bundle,
    TileFab,
    MultipleTiles,
    Prefab,
    Empty,
}

/// Image shown for a clipboard item or favorite
#[derive(Debug, Clone, PartialEq)]
pub enum ItemIcon {
    Sprite(SpriteRef),
    Image(Arc<RgbaImage>),
}

/// Input for a single-tile clipboard item
#[derive(Debug, Clone)]
pub struct TilePick {
    pub tile: Option<TileHandle>,
    pub position: IVec3,
    /// Name of the tilemap the tile was picked from
    pub source_map: Option<String>,
    pub transform: Mat4,
    pub color: Color,
    pub was_picked: bool,
}

impl TilePick {
    /// Tile picked from a tilemap cell
    pub fn from_map(tile: TileHandle, position: IVec3, source_map: impl Into<String>) -> Self {
        Self {
            tile: Some(tile),
            position,
            source_map: Some(source_map.into()),
            transform: Mat4::IDENTITY,
            color: Color::WHITE,
            was_picked: true,
        }
    }

    /// Tile chosen from Favorites or an asset list, not from a tilemap
    pub fn from_asset(tile: TileHandle) -> Self {
        Self {
            tile: Some(tile),
            position: IMPOSSIBLE_POSITION,
            source_map: None,
            transform: Mat4::IDENTITY,
            color: Color::WHITE,
            was_picked: false,
        }
    }
}

/// Single tile selection
#[derive(Debug, Clone)]
pub struct TileSelection {
    tile: Option<TileHandle>,
    flags: TileFlags,
    pub position: IVec3,
    pub source_map: Option<String>,
    pub transform: Mat4,
    pub color: Color,
    pub was_picked: bool,
}

impl TileSelection {
    fn new(pick: TilePick) -> Self {
        Self {
            flags: TileFlags::probe(pick.tile.as_ref()),
            tile: pick.tile,
            position: pick.position,
            source_map: pick.source_map,
            transform: pick.transform,
            color: pick.color,
            was_picked: pick.was_picked,
        }
    }

    pub fn tile(&self) -> Option<&TileHandle> {
        self.tile.as_ref()
    }

    pub fn flags(&self) -> TileFlags {
        self.flags
    }

    /// Favorites-origin tiles sit at the impossible position
    pub fn is_from_favorites(&self) -> bool {
        self.position == IMPOSSIBLE_POSITION
    }

    pub fn is_valid(&self) -> bool {
        self.tile.is_some() && (self.source_map.is_some() || self.is_from_favorites())
    }

    /// Plain tiles have no transform or color to edit
    fn editable(&self) -> bool {
        self.tile.is_some() && self.flags.has_transform()
    }

    fn to_pick(&self) -> TilePick {
        TilePick {
            tile: self.tile.clone(),
            position: self.position,
            source_map: self.source_map.clone(),
            transform: self.transform,
            color: self.color,
            was_picked: self.was_picked,
        }
    }
}

/// Prefab selection with its placement transform
#[derive(Debug, Clone)]
pub struct PrefabSelection {
    pub asset: AssetRef,
    pub transform: Mat4,
    preview: Option<Arc<RgbaImage>>,
}

impl PrefabSelection {
    pub fn preview(&self) -> Option<&Arc<RgbaImage>> {
        self.preview.as_ref()
    }
}

/// Multi-cell selection and its icon, if one was made
#[derive(Debug, Clone)]
pub struct MultiTileSelection {
    pub grid: CellGrid,
    pub icon: Option<ItemIcon>,
}

/// Variant payload of a clipboard item
#[derive(Debug, Clone, Default)]
pub enum ClipboardContent {
    #[default]
    Empty,
    Tile(TileSelection),
    Bundle(AssetRef),
    TileFab(AssetRef),
    Prefab(PrefabSelection),
    MultipleTiles(MultiTileSelection),
}

/// What a clipboard item paints
#[derive(Debug, Clone, Copy)]
pub enum ClipboardTarget<'a> {
    Tile(&'a TileHandle),
    Asset(&'a AssetRef),
}

/// The current selection, ready to paint.
///
/// Constructors never fail: a missing required input is logged and gives an
/// item whose [`ClipboardItem::is_valid`] is false. Copies go through
/// [`ClipboardItem::clone_instance`], which hands out a new sequence index.
#[derive(Debug)]
pub struct ClipboardItem {
    identity: Uuid,
    sequence_index: u64,
    transform_modified: bool,
    color_modified: bool,
    cells_modified: bool,
    from_conversion: bool,
    origin_favorites: bool,
    content: ClipboardContent,
}

impl Default for ClipboardItem {
    /// Empty item outside any session (sequence index 0)
    fn default() -> Self {
        Self {
            identity: Uuid::nil(),
            sequence_index: 0,
            transform_modified: false,
            color_modified: false,
            cells_modified: false,
            from_conversion: false,
            origin_favorites: false,
            content: ClipboardContent::Empty,
        }
    }
}

impl ClipboardItem {
    fn with_content(session: &mut ClipboardSession, content: ClipboardContent) -> Self {
        Self {
            identity: Uuid::new_v4(),
            sequence_index: session.next_sequence(),
            content,
            ..Default::default()
        }
    }

    pub fn empty(session: &mut ClipboardSession) -> Self {
        Self::with_content(session, ClipboardContent::Empty)
    }

    pub fn from_tile(session: &mut ClipboardSession, pick: TilePick) -> Self {
        if pick.tile.is_none() {
            error!("Clipboard: tile selection at {:?} has no tile", pick.position);
        } else if pick.source_map.is_none() && pick.position != IMPOSSIBLE_POSITION {
            error!(
                "Clipboard: tile selection at {:?} has no source tilemap",
                pick.position
            );
        }
        Self::with_content(session, ClipboardContent::Tile(TileSelection::new(pick)))
    }

    /// Tile chosen from Favorites
    pub fn from_favorite_tile(session: &mut ClipboardSession, tile: TileHandle) -> Self {
        let mut item = Self::from_tile(session, TilePick::from_asset(tile));
        item.origin_favorites = true;
        item
    }

    pub fn from_bundle(session: &mut ClipboardSession, asset: Option<AssetRef>) -> Self {
        match Self::checked_asset(asset, AssetKind::Bundle) {
            Some(asset) => Self::with_content(session, ClipboardContent::Bundle(asset)),
            None => Self::empty(session),
        }
    }

    pub fn from_tilefab(session: &mut ClipboardSession, asset: Option<AssetRef>) -> Self {
        match Self::checked_asset(asset, AssetKind::TileFab) {
            Some(asset) => Self::with_content(session, ClipboardContent::TileFab(asset)),
            None => Self::empty(session),
        }
    }

    pub fn from_prefab(
        session: &mut ClipboardSession,
        asset: Option<AssetRef>,
        transform: Mat4,
    ) -> Self {
        match Self::checked_asset(asset, AssetKind::Prefab) {
            Some(asset) => Self::with_content(
                session,
                ClipboardContent::Prefab(PrefabSelection {
                    asset,
                    transform,
                    preview: None,
                }),
            ),
            None => Self::empty(session),
        }
    }

    /// Multi-cell selection. `cells` are relative to `pivot`; `selection_bounds`
    /// is where they were picked from.
    pub fn from_cells(
        session: &mut ClipboardSession,
        cells: Vec<TileCell>,
        selection_bounds: GridBounds,
        pivot: IVec3,
    ) -> Self {
        if cells.is_empty() {
            error!("Clipboard: multiple-tile selection has no cells");
        }
        let grid = CellGrid::new(cells, selection_bounds, pivot);
        Self::with_content(
            session,
            ClipboardContent::MultipleTiles(MultiTileSelection { grid, icon: None }),
        )
    }

    fn checked_asset(asset: Option<AssetRef>, kind: AssetKind) -> Option<AssetRef> {
        match asset {
            None => {
                error!("Clipboard: no {} asset given", kind.display_name());
                None
            }
            Some(asset) if asset.kind != kind || !asset.is_valid() => {
                error!(
                    "Clipboard: expected a {} asset, got {:?}",
                    kind.display_name(),
                    asset
                );
                None
            }
            Some(asset) => Some(asset),
        }
    }

    /// Mark the item as produced by converting another selection
    pub fn converted(mut self) -> Self {
        self.from_conversion = true;
        self
    }

    /// Mark the item as coming from Favorites
    pub fn from_favorites(mut self) -> Self {
        self.origin_favorites = true;
        self
    }

    // Queries

    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn sequence_index(&self) -> u64 {
        self.sequence_index
    }

    pub fn transform_modified(&self) -> bool {
        self.transform_modified
    }

    pub fn color_modified(&self) -> bool {
        self.color_modified
    }

    pub fn cells_modified(&self) -> bool {
        self.cells_modified
    }

    pub fn any_modifications(&self) -> bool {
        self.transform_modified || self.color_modified || self.cells_modified
    }

    pub fn is_from_conversion(&self) -> bool {
        self.from_conversion
    }

    pub fn is_origin_favorites(&self) -> bool {
        self.origin_favorites
    }

    pub fn content(&self) -> &ClipboardContent {
        &self.content
    }

    pub fn variety(&self) -> ItemVariety {
        match &self.content {
            ClipboardContent::Empty => ItemVariety::Empty,
            ClipboardContent::Tile(_) => ItemVariety::Tile,
            ClipboardContent::Bundle(_) => ItemVariety::Bundle,
            ClipboardContent::TileFab(_) => ItemVariety::TileFab,
            ClipboardContent::Prefab(_) => ItemVariety::Prefab,
            ClipboardContent::MultipleTiles(_) => ItemVariety::MultipleTiles,
        }
    }

    pub fn is_valid(&self) -> bool {
        match &self.content {
            ClipboardContent::Empty => false,
            ClipboardContent::Tile(sel) => sel.is_valid(),
            ClipboardContent::Bundle(asset) | ClipboardContent::TileFab(asset) => asset.is_valid(),
            ClipboardContent::Prefab(sel) => sel.asset.is_valid(),
            ClipboardContent::MultipleTiles(sel) => sel.grid.is_valid(),
        }
    }

    pub fn target(&self) -> Option<ClipboardTarget<'_>> {
        match &self.content {
            ClipboardContent::Tile(sel) => sel.tile().map(ClipboardTarget::Tile),
            ClipboardContent::Bundle(asset) | ClipboardContent::TileFab(asset) => {
                Some(ClipboardTarget::Asset(asset))
            }
            ClipboardContent::Prefab(sel) => Some(ClipboardTarget::Asset(&sel.asset)),
            ClipboardContent::MultipleTiles(_) | ClipboardContent::Empty => None,
        }
    }

    pub fn target_name(&self) -> String {
        match &self.content {
            ClipboardContent::Empty => "Empty".to_string(),
            ClipboardContent::Tile(sel) => sel
                .tile()
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "Missing tile".to_string()),
            ClipboardContent::Bundle(asset) | ClipboardContent::TileFab(asset) => {
                asset.name().to_string()
            }
            ClipboardContent::Prefab(sel) => sel.asset.name().to_string(),
            ClipboardContent::MultipleTiles(sel) => {
                format!("Multiple tiles ({})", sel.grid.tile_count())
            }
        }
    }

    pub fn icon(&self) -> Option<ItemIcon> {
        match &self.content {
            ClipboardContent::Tile(sel) => sel
                .tile()
                .and_then(|t| t.sprite())
                .cloned()
                .map(ItemIcon::Sprite),
            ClipboardContent::Prefab(sel) => sel.preview.clone().map(ItemIcon::Image),
            ClipboardContent::MultipleTiles(sel) => sel.icon.clone(),
            ClipboardContent::Bundle(_) | ClipboardContent::TileFab(_) | ClipboardContent::Empty => {
                None
            }
        }
    }

    pub fn grid(&self) -> Option<&CellGrid> {
        match &self.content {
            ClipboardContent::MultipleTiles(sel) => Some(&sel.grid),
            _ => None,
        }
    }

    pub fn tile_selection(&self) -> Option<&TileSelection> {
        match &self.content {
            ClipboardContent::Tile(sel) => Some(sel),
            _ => None,
        }
    }

    pub fn prefab_selection(&self) -> Option<&PrefabSelection> {
        match &self.content {
            ClipboardContent::Prefab(sel) => Some(sel),
            _ => None,
        }
    }

    /// Paint offset of a multi-cell item; zero for everything else
    pub fn offset_modifier(&self) -> IVec3 {
        self.grid().map(CellGrid::offset_modifier).unwrap_or(IVec3::ZERO)
    }

    // Mutation

    pub fn set_icon(&mut self, icon: ItemIcon) -> bool {
        match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                sel.icon = Some(icon);
                true
            }
            _ => false,
        }
    }

    pub fn set_prefab_preview(&mut self, preview: Arc<RgbaImage>) -> bool {
        match &mut self.content {
            ClipboardContent::Prefab(sel) => {
                sel.preview = Some(preview);
                true
            }
            _ => false,
        }
    }

    pub fn apply_transform(&mut self, transform: Mat4, flags: ApplyFlags) -> MutationOutcome {
        if !flags.transform {
            return MutationOutcome::Unchanged;
        }
        let locked = match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                let locked = sel.grid.any_lock_transform();
                sel.grid.set_transform_all(transform);
                locked
            }
            ClipboardContent::Tile(sel) if sel.editable() => {
                sel.transform = transform;
                sel.flags.lock_transform()
            }
            ClipboardContent::Prefab(sel) => {
                sel.transform = transform;
                false
            }
            _ => return MutationOutcome::Unchanged,
        };
        self.transform_modified = true;
        self.finish("transform", locked)
    }

    pub fn apply_color(&mut self, color: Color, flags: ApplyFlags) -> MutationOutcome {
        if !flags.color {
            return MutationOutcome::Unchanged;
        }
        let locked = match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                let locked = sel.grid.any_lock_color();
                sel.grid.set_color_all(color);
                locked
            }
            ClipboardContent::Tile(sel) if sel.editable() => {
                sel.color = color;
                sel.flags.lock_color()
            }
            _ => return MutationOutcome::Unchanged,
        };
        self.color_modified = true;
        self.finish("color", locked)
    }

    /// Rotate 90 degrees. With `affects_group` a multi-cell item rotates as
    /// a block; otherwise each cell turns in place.
    pub fn rotate(&mut self, ccw: bool, affects_group: bool) -> MutationOutcome {
        let direction = RotationDirection::from_ccw(ccw);
        let locked = match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                let locked = sel.grid.any_lock_transform();
                if affects_group {
                    if !sel.grid.rotate_block(direction) {
                        return MutationOutcome::Unchanged;
                    }
                    sel.icon = None;
                } else {
                    sel.grid.rotate_cells(direction);
                }
                self.cells_modified = true;
                locked
            }
            ClipboardContent::Tile(sel) if sel.editable() => {
                sel.transform = direction.matrix() * sel.transform;
                sel.flags.lock_transform()
            }
            ClipboardContent::Prefab(sel) => {
                sel.transform = direction.matrix() * sel.transform;
                false
            }
            _ => return MutationOutcome::Unchanged,
        };
        self.transform_modified = true;
        self.finish("rotation", locked)
    }

    /// Flip on X (or Y). `affects_group` as for [`ClipboardItem::rotate`].
    pub fn flip(&mut self, flip_x: bool, affects_group: bool) -> MutationOutcome {
        let axis = FlipAxis::from_flip_x(flip_x);
        let locked = match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                let locked = sel.grid.any_lock_transform();
                if affects_group {
                    if !sel.grid.flip_block(axis) {
                        return MutationOutcome::Unchanged;
                    }
                    sel.icon = None;
                } else {
                    sel.grid.flip_cells(axis);
                }
                self.cells_modified = true;
                locked
            }
            ClipboardContent::Tile(sel) if sel.editable() => {
                sel.transform = axis.matrix() * sel.transform;
                sel.flags.lock_transform()
            }
            ClipboardContent::Prefab(sel) => {
                sel.transform = axis.matrix() * sel.transform;
                false
            }
            _ => return MutationOutcome::Unchanged,
        };
        self.transform_modified = true;
        self.finish("flip", locked)
    }

    /// Move a multi-cell item's paint anchor to the next corner
    pub fn rotate_pivot(&mut self) -> bool {
        match &mut self.content {
            ClipboardContent::MultipleTiles(sel) => {
                sel.grid.rotate_pivot();
                true
            }
            _ => false,
        }
    }

    fn finish(&self, edit: &str, locked: bool) -> MutationOutcome {
        if locked {
            warn!(
                "'{}' has locked tiles; {} was applied anyway",
                self.target_name(),
                edit
            );
            MutationOutcome::AppliedWithLockWarning
        } else {
            MutationOutcome::Applied
        }
    }

    /// Independent copy with a fresh sequence index and the same identity.
    /// Cells are copied, never shared.
    pub fn clone_instance(&self, session: &mut ClipboardSession) -> ClipboardItem {
        session.note_reclone();
        let mut copy = match &self.content {
            ClipboardContent::Empty => Self::empty(session),
            ClipboardContent::Tile(sel) => Self::from_tile(session, sel.to_pick()),
            ClipboardContent::Bundle(asset) => Self::from_bundle(session, Some(asset.clone())),
            ClipboardContent::TileFab(asset) => Self::from_tilefab(session, Some(asset.clone())),
            ClipboardContent::Prefab(sel) => {
                let mut item = Self::from_prefab(session, Some(sel.asset.clone()), sel.transform);
                if let Some(preview) = &sel.preview {
                    item.set_prefab_preview(preview.clone());
                }
                item
            }
            ClipboardContent::MultipleTiles(sel) => {
                let mut grid = sel.grid.clone();
                grid.sync_brush();
                Self::with_content(
                    session,
                    ClipboardContent::MultipleTiles(MultiTileSelection {
                        grid,
                        icon: sel.icon.clone(),
                    }),
                )
            }
        };
        copy.identity = self.identity;
        copy.origin_favorites = self.origin_favorites;
        copy
    }

    /// Back to an empty item. The only way to clear the modified flags.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
