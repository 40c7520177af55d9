//! Block rotate/flip over a multi-cell selection.
//!
//! The grid keeps its cells relative to `pivot` and mirrors them into a
//! [`GridBrush`] that does the actual geometry. After an atomic operation
//! the cells, bounds, pivot and corner state are rebuilt from the brush in
//! one step, so callers never observe a half-rotated grid.

use std::collections::HashMap;

use bevy::prelude::*;

use super::bounds::GridBounds;
use super::brush::{Brush, BrushCell, FlipAxis, GridBrush, RotationDirection};
use super::cell::TileCell;
use super::corner::CornerState;

/// Cells of a multi-tile selection plus the geometry needed to transform
/// and paint them as a group
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<TileCell>,
    /// Always anchored at the origin
    local_bounds: GridBounds,
    /// Bounds as picked from the tilemap
    selection_bounds: GridBounds,
    pivot: IVec3,
    pivot_corner: CornerState,
    cells_corner: CornerState,
    /// Set when the brush could not be brought in line with the cells.
    /// Atomic operations are no-ops until [`CellGrid::reinitialize`].
    invalid: bool,
    brush: GridBrush,
}

impl CellGrid {
    pub fn new(cells: Vec<TileCell>, selection_bounds: GridBounds, pivot: IVec3) -> Self {
        let mut grid = Self {
            cells: Vec::new(),
            local_bounds: GridBounds::default(),
            selection_bounds: GridBounds::default(),
            pivot: IVec3::ZERO,
            pivot_corner: CornerState::Original,
            cells_corner: CornerState::Original,
            invalid: false,
            brush: GridBrush::default(),
        };
        grid.reinitialize(cells, selection_bounds, pivot);
        grid
    }

    /// Replace the grid contents and clear the invalid flag
    pub fn reinitialize(&mut self, cells: Vec<TileCell>, selection_bounds: GridBounds, pivot: IVec3) {
        let size = IVec3::new(selection_bounds.size.x, selection_bounds.size.y, 1);
        self.cells = cells;
        self.local_bounds = GridBounds::at_origin(size);
        self.selection_bounds = selection_bounds;
        self.pivot = IVec3::new(pivot.x, pivot.y, 0);
        self.pivot_corner = CornerState::Original;
        self.cells_corner = CornerState::Original;
        self.invalid = false;
        self.sync_brush();
    }

    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    /// Mutable access to individual cells. Call [`CellGrid::sync_brush`]
    /// afterwards so atomic operations see the change.
    pub fn cells_mut(&mut self) -> &mut [TileCell] {
        &mut self.cells
    }

    pub fn local_bounds(&self) -> GridBounds {
        self.local_bounds
    }

    pub fn selection_bounds(&self) -> GridBounds {
        self.selection_bounds
    }

    pub fn pivot(&self) -> IVec3 {
        self.pivot
    }

    pub fn pivot_corner(&self) -> CornerState {
        self.pivot_corner
    }

    pub fn cells_corner(&self) -> CornerState {
        self.cells_corner
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid && !self.cells.is_empty()
    }

    pub fn brush(&self) -> &GridBrush {
        &self.brush
    }

    /// Number of cells holding a tile
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.tile().is_some()).count()
    }

    pub fn any_lock_transform(&self) -> bool {
        self.cells.iter().any(|c| c.flags().lock_transform())
    }

    pub fn any_lock_color(&self) -> bool {
        self.cells.iter().any(|c| c.flags().lock_color())
    }

    /// Bring the brush in line with the cells.
    ///
    /// A cell count mismatch triggers one full reinitialization of the
    /// brush; if that doesn't fix it the grid is marked invalid.
    pub fn sync_brush(&mut self) -> bool {
        if self.invalid {
            return false;
        }

        self.load_brush(false);
        if self.brush.cell_count() == self.cells.len() {
            return true;
        }

        warn!(
            "Brush has {} cells but selection has {}, reinitializing brush",
            self.brush.cell_count(),
            self.cells.len()
        );
        self.load_brush(true);
        if self.brush.cell_count() == self.cells.len() {
            return true;
        }

        warn!(
            "Selection geometry is out of sync ({} cells for bounds {:?}), block transforms disabled",
            self.cells.len(),
            self.local_bounds.size
        );
        self.invalid = true;
        false
    }

    fn load_brush(&mut self, reinitialize: bool) {
        if reinitialize || self.brush.size() != self.local_bounds.size {
            self.brush.resize(self.local_bounds.size);
        } else {
            self.brush.cells_mut().fill(BrushCell::default());
        }
        self.brush.repivot(self.pivot);

        let lookup: HashMap<IVec3, &TileCell> = self
            .cells
            .iter()
            .filter(|c| c.tile().is_some())
            .map(|c| (c.position + self.pivot, c))
            .collect();

        for position in self.local_bounds.positions() {
            let Some(cell) = lookup.get(&position) else {
                continue;
            };
            if let Some(index) = self.brush.get_cell_index(position) {
                self.brush.cells_mut()[index] = BrushCell {
                    tile: cell.tile().cloned(),
                    color: cell.color,
                    transform: cell.transform,
                };
            }
        }
    }

    /// Rotate the whole block 90 degrees around the pivot.
    ///
    /// Returns false (and changes nothing) when the grid is invalid.
    pub fn rotate_block(&mut self, direction: RotationDirection) -> bool {
        if !self.is_valid() || !self.sync_brush() {
            return false;
        }
        self.brush.rotate(direction);
        self.read_back_brush();
        true
    }

    /// Mirror the whole block along `axis`
    pub fn flip_block(&mut self, axis: FlipAxis) -> bool {
        if !self.is_valid() || !self.sync_brush() {
            return false;
        }
        self.brush.flip(axis);
        self.read_back_brush();
        true
    }

    fn read_back_brush(&mut self) {
        let brush_pivot = self.brush.pivot();
        let brush_size = self.brush.size();
        let pivot = IVec3::new(brush_pivot.x, brush_pivot.y, 0);
        let size = IVec3::new(brush_size.x, brush_size.y, 1);

        self.pivot = pivot;
        self.local_bounds = GridBounds::at_origin(size);
        self.selection_bounds = GridBounds::new(pivot, size);

        let brush = &self.brush;
        self.cells = self
            .local_bounds
            .positions()
            .map(|position| {
                let cell = brush.cell(position).cloned().unwrap_or_default();
                TileCell::new(cell.tile, position - pivot, cell.transform, cell.color)
            })
            .collect();

        self.pivot_corner = CornerState::classify(pivot, size);
        self.cells_corner = self.pivot_corner;
    }

    /// Rotate every cell in place without moving any of them
    pub fn rotate_cells(&mut self, direction: RotationDirection) {
        let rotation = direction.matrix();
        for cell in &mut self.cells {
            cell.transform = rotation * cell.transform;
        }
        self.sync_brush();
    }

    /// Mirror every cell in place without moving any of them
    pub fn flip_cells(&mut self, axis: FlipAxis) {
        let mirror = axis.matrix();
        for cell in &mut self.cells {
            cell.transform = mirror * cell.transform;
        }
        self.sync_brush();
    }

    pub fn set_transform_all(&mut self, transform: Mat4) {
        for cell in &mut self.cells {
            cell.transform = transform;
        }
        self.sync_brush();
    }

    pub fn set_color_all(&mut self, color: Color) {
        for cell in &mut self.cells {
            cell.color = color;
        }
        self.sync_brush();
    }

    /// Move the paint anchor to the next corner, clockwise. Cells don't move.
    pub fn rotate_pivot(&mut self) {
        self.cells_corner = self.cells_corner.next_clockwise();
    }

    /// Translation that anchors the group under the paint target
    pub fn offset_modifier(&self) -> IVec3 {
        self.cells_corner.anchor_offset(self.local_bounds.size) + self.pivot
    }
}
