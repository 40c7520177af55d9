//! Rectangular transform buffer used for block rotation and flipping.
//!
//! A brush holds `size.x * size.y * size.z` cells addressed by position
//! relative to its minimum corner, plus a pivot inside that box. Rotating
//! the brush moves cells, swaps width and height and moves the pivot with
//! them; flipping mirrors cells and pivot along one axis.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::tiles::TileHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn from_ccw(ccw: bool) -> Self {
        if ccw {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        }
    }

    /// Rotation about the grid normal. Y points up, so clockwise is negative.
    pub fn matrix(self) -> Mat4 {
        let angle = match self {
            RotationDirection::Clockwise => -FRAC_PI_2,
            RotationDirection::CounterClockwise => FRAC_PI_2,
        };
        Mat4::from_rotation_z(angle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    X,
    Y,
}

impl FlipAxis {
    pub fn from_flip_x(flip_x: bool) -> Self {
        if flip_x { FlipAxis::X } else { FlipAxis::Y }
    }

    pub fn matrix(self) -> Mat4 {
        match self {
            FlipAxis::X => Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
            FlipAxis::Y => Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0)),
        }
    }
}

/// Contents of one brush position
#[derive(Debug, Clone)]
pub struct BrushCell {
    pub tile: Option<TileHandle>,
    pub color: Color,
    pub transform: Mat4,
}

impl Default for BrushCell {
    fn default() -> Self {
        Self {
            tile: None,
            color: Color::WHITE,
            transform: Mat4::IDENTITY,
        }
    }
}

/// Bounded rectangular buffer that performs the rotate/flip geometry.
pub trait Brush {
    fn size(&self) -> IVec3;
    fn pivot(&self) -> IVec3;

    /// Resize and clear all cells
    fn resize(&mut self, size: IVec3);
    fn repivot(&mut self, pivot: IVec3);

    /// Index into [`Brush::cells`] of a position relative to the minimum corner
    fn get_cell_index(&self, position: IVec3) -> Option<usize>;

    fn cells(&self) -> &[BrushCell];
    fn cells_mut(&mut self) -> &mut [BrushCell];

    fn rotate(&mut self, direction: RotationDirection);
    fn flip(&mut self, axis: FlipAxis);

    fn cell_count(&self) -> usize {
        self.cells().len()
    }

    fn cell(&self, position: IVec3) -> Option<&BrushCell> {
        self.get_cell_index(position).and_then(|i| self.cells().get(i))
    }

    fn set_cell(&mut self, position: IVec3, cell: BrushCell) -> bool {
        match self.get_cell_index(position) {
            Some(index) => {
                self.cells_mut()[index] = cell;
                true
            }
            None => false,
        }
    }
}

/// Default [`Brush`] implementation over a flat vector of cells
#[derive(Debug, Clone, Default)]
pub struct GridBrush {
    size: IVec3,
    pivot: IVec3,
    cells: Vec<BrushCell>,
}

impl GridBrush {
    pub fn new(size: IVec3, pivot: IVec3) -> Self {
        let mut brush = Self::default();
        brush.resize(size);
        brush.repivot(pivot);
        brush
    }

    fn index_for(size: IVec3, p: IVec3) -> usize {
        (p.x + size.x * p.y + size.x * size.y * p.z) as usize
    }

    fn volume(size: IVec3) -> usize {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return 0;
        }
        size.x as usize * size.y as usize * size.z as usize
    }

    fn positions(size: IVec3) -> impl Iterator<Item = IVec3> {
        (0..size.z.max(0)).flat_map(move |z| {
            (0..size.y.max(0))
                .flat_map(move |y| (0..size.x.max(0)).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

impl Brush for GridBrush {
    fn size(&self) -> IVec3 {
        self.size
    }

    fn pivot(&self) -> IVec3 {
        self.pivot
    }

    fn resize(&mut self, size: IVec3) {
        self.size = size;
        self.cells = vec![BrushCell::default(); Self::volume(size)];
    }

    fn repivot(&mut self, pivot: IVec3) {
        self.pivot = pivot;
    }

    fn get_cell_index(&self, position: IVec3) -> Option<usize> {
        let inside = position.cmpge(IVec3::ZERO).all() && position.cmplt(self.size).all();
        inside.then(|| Self::index_for(self.size, position))
    }

    fn cells(&self) -> &[BrushCell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [BrushCell] {
        &mut self.cells
    }

    fn rotate(&mut self, direction: RotationDirection) {
        let old_size = self.size;
        let new_size = IVec3::new(old_size.y, old_size.x, old_size.z);
        let mut old_cells = std::mem::take(&mut self.cells);
        let mut new_cells = vec![BrushCell::default(); old_cells.len()];

        for old in Self::positions(old_size) {
            let new = match direction {
                RotationDirection::Clockwise => IVec3::new(old.y, old_size.x - old.x - 1, old.z),
                RotationDirection::CounterClockwise => {
                    IVec3::new(old_size.y - old.y - 1, old.x, old.z)
                }
            };
            let from = Self::index_for(old_size, old);
            let to = Self::index_for(new_size, new);
            new_cells[to] = std::mem::take(&mut old_cells[from]);
        }

        let p = self.pivot;
        self.pivot = match direction {
            RotationDirection::Clockwise => IVec3::new(p.y, old_size.x - p.x - 1, p.z),
            RotationDirection::CounterClockwise => IVec3::new(old_size.y - p.y - 1, p.x, p.z),
        };
        self.size = new_size;

        let rotation = direction.matrix();
        for cell in &mut new_cells {
            cell.transform = rotation * cell.transform;
        }
        self.cells = new_cells;
    }

    fn flip(&mut self, axis: FlipAxis) {
        let size = self.size;
        let mut old_cells = std::mem::take(&mut self.cells);
        let mut new_cells = vec![BrushCell::default(); old_cells.len()];

        for old in Self::positions(size) {
            let new = match axis {
                FlipAxis::X => IVec3::new(size.x - old.x - 1, old.y, old.z),
                FlipAxis::Y => IVec3::new(old.x, size.y - old.y - 1, old.z),
            };
            let from = Self::index_for(size, old);
            let to = Self::index_for(size, new);
            new_cells[to] = std::mem::take(&mut old_cells[from]);
        }

        let p = self.pivot;
        self.pivot = match axis {
            FlipAxis::X => IVec3::new(size.x - p.x - 1, p.y, p.z),
            FlipAxis::Y => IVec3::new(p.x, size.y - p.y - 1, p.z),
        };

        let mirror = axis.matrix();
        for cell in &mut new_cells {
            cell.transform = mirror * cell.transform;
        }
        self.cells = new_cells;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{SpriteTile, Tile};
    use std::sync::Arc;

    fn named(name: &str) -> BrushCell {
        BrushCell {
            tile: Some(Arc::new(SpriteTile::new(name, None))),
            ..Default::default()
        }
    }

    fn name_at(brush: &GridBrush, p: IVec3) -> Option<String> {
        brush
            .cell(p)
            .and_then(|c| c.tile.as_ref())
            .map(|t| t.name().to_string())
    }

    #[test]
    fn test_resize_clears_cells() {
        let mut brush = GridBrush::new(IVec3::new(2, 2, 1), IVec3::ZERO);
        assert!(brush.set_cell(IVec3::new(1, 1, 0), named("a")));
        brush.resize(IVec3::new(3, 1, 1));
        assert_eq!(brush.cell_count(), 3);
        assert!(brush.cells().iter().all(|c| c.tile.is_none()));
    }

    #[test]
    fn test_cell_index_out_of_range() {
        let brush = GridBrush::new(IVec3::new(2, 3, 1), IVec3::ZERO);
        assert_eq!(brush.get_cell_index(IVec3::new(1, 2, 0)), Some(5));
        assert_eq!(brush.get_cell_index(IVec3::new(2, 0, 0)), None);
        assert_eq!(brush.get_cell_index(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_rotate_clockwise_moves_cells_and_pivot() {
        // 2 wide, 3 tall; "a" bottom-left, "b" top-left
        let mut brush = GridBrush::new(IVec3::new(2, 3, 1), IVec3::ZERO);
        brush.set_cell(IVec3::new(0, 0, 0), named("a"));
        brush.set_cell(IVec3::new(0, 2, 0), named("b"));

        brush.rotate(RotationDirection::Clockwise);

        assert_eq!(brush.size(), IVec3::new(3, 2, 1));
        // bottom-left goes to top-left, top-left goes to top-right
        assert_eq!(name_at(&brush, IVec3::new(0, 1, 0)).as_deref(), Some("a"));
        assert_eq!(name_at(&brush, IVec3::new(2, 1, 0)).as_deref(), Some("b"));
        assert_eq!(brush.pivot(), IVec3::new(0, 1, 0));
    }

    #[test]
    fn test_rotate_counter_clockwise_moves_pivot() {
        let mut brush = GridBrush::new(IVec3::new(2, 3, 1), IVec3::ZERO);
        brush.rotate(RotationDirection::CounterClockwise);
        assert_eq!(brush.size(), IVec3::new(3, 2, 1));
        assert_eq!(brush.pivot(), IVec3::new(2, 0, 0));
    }

    #[test]
    fn test_flip_mirrors_pivot() {
        let mut brush = GridBrush::new(IVec3::new(4, 2, 1), IVec3::new(1, 0, 0));
        brush.set_cell(IVec3::new(0, 0, 0), named("a"));

        brush.flip(FlipAxis::X);
        assert_eq!(brush.pivot(), IVec3::new(2, 0, 0));
        assert_eq!(name_at(&brush, IVec3::new(3, 0, 0)).as_deref(), Some("a"));

        brush.flip(FlipAxis::Y);
        assert_eq!(brush.pivot(), IVec3::new(2, 1, 0));
        assert_eq!(name_at(&brush, IVec3::new(3, 1, 0)).as_deref(), Some("a"));
    }

    #[test]
    fn test_rotation_matrix_turns_x_axis() {
        let cw = RotationDirection::Clockwise.matrix();
        let v = cw.transform_vector3(Vec3::X);
        assert!((v - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }
}
