//! Integer bounding boxes over grid positions.

use bevy::math::IVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned integer box: `position` is the minimum corner, `size` the
/// extent on each axis. Positions within are `position..position + size`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridBounds {
    pub position: IVec3,
    pub size: IVec3,
}

impl GridBounds {
    pub fn new(position: IVec3, size: IVec3) -> Self {
        Self { position, size }
    }

    /// Bounds of the given size anchored at the origin
    pub fn at_origin(size: IVec3) -> Self {
        Self {
            position: IVec3::ZERO,
            size,
        }
    }

    pub fn min(&self) -> IVec3 {
        self.position
    }

    /// Exclusive maximum corner
    pub fn max(&self) -> IVec3 {
        self.position + self.size
    }

    /// Number of positions inside, zero for degenerate boxes
    pub fn volume(&self) -> usize {
        if self.size.x <= 0 || self.size.y <= 0 || self.size.z <= 0 {
            return 0;
        }
        self.size.x as usize * self.size.y as usize * self.size.z as usize
    }

    pub fn contains(&self, p: IVec3) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y && p.z >= min.z && p.z < max.z
    }

    /// Every position inside, x varying fastest, then y, then z
    pub fn positions(&self) -> impl Iterator<Item = IVec3> + use<> {
        let min = self.min();
        let max = self.max();
        (min.z..max.z).flat_map(move |z| {
            (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

/// Serialized form of [`GridBounds`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBounds {
    pub position: [i32; 3],
    pub size: [i32; 3],
}

impl From<GridBounds> for SavedBounds {
    fn from(b: GridBounds) -> Self {
        Self {
            position: b.position.to_array(),
            size: b.size.to_array(),
        }
    }
}

impl From<SavedBounds> for GridBounds {
    fn from(b: SavedBounds) -> Self {
        Self {
            position: IVec3::from_array(b.position),
            size: IVec3::from_array(b.size),
        }
    }
}
