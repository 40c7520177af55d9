//! Which corner of its bounding box a group's pivot occupies.

use bevy::math::IVec3;
use thiserror::Error;

/// Corner classification that drives paint-offset computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CornerState {
    /// Never rotated or re-anchored since the pick
    #[default]
    Original,
    LeftBottom,
    LeftTop,
    RightTop,
    RightBottom,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid corner state index {0}")]
pub struct InvalidCornerState(pub u8);

impl CornerState {
    /// Classify a pivot against a grid of `size`.
    ///
    /// A pivot that is on none of the other three corners counts as
    /// `RightTop`, including pivots in the interior.
    pub fn classify(pivot: IVec3, size: IVec3) -> Self {
        let right = size.x - 1;
        let top = size.y - 1;
        match (pivot.x, pivot.y) {
            (0, 0) => CornerState::LeftBottom,
            (0, y) if y == top => CornerState::LeftTop,
            (x, 0) if x == right => CornerState::RightBottom,
            _ => CornerState::RightTop,
        }
    }

    /// Next corner when the pivot is rotated clockwise around the box
    pub fn next_clockwise(self) -> Self {
        match self {
            CornerState::Original | CornerState::LeftBottom => CornerState::LeftTop,
            CornerState::LeftTop => CornerState::RightTop,
            CornerState::RightTop => CornerState::RightBottom,
            CornerState::RightBottom => CornerState::LeftBottom,
        }
    }

    /// Translation that anchors a `size` group at this corner
    pub fn anchor_offset(self, size: IVec3) -> IVec3 {
        let w = size.x - 1;
        let h = size.y - 1;
        match self {
            CornerState::Original | CornerState::LeftBottom => IVec3::ZERO,
            CornerState::LeftTop => IVec3::new(0, -h, 0),
            CornerState::RightTop => IVec3::new(-w, -h, 0),
            CornerState::RightBottom => IVec3::new(-w, 0, 0),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            CornerState::Original => 0,
            CornerState::LeftBottom => 1,
            CornerState::LeftTop => 2,
            CornerState::RightTop => 3,
            CornerState::RightBottom => 4,
        }
    }
}

impl TryFrom<u8> for CornerState {
    type Error = InvalidCornerState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CornerState::Original),
            1 => Ok(CornerState::LeftBottom),
            2 => Ok(CornerState::LeftTop),
            3 => Ok(CornerState::RightTop),
            4 => Ok(CornerState::RightBottom),
            other => Err(InvalidCornerState(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_corners() {
        let size = IVec3::new(3, 2, 1);
        assert_eq!(CornerState::classify(IVec3::new(0, 0, 0), size), CornerState::LeftBottom);
        assert_eq!(CornerState::classify(IVec3::new(0, 1, 0), size), CornerState::LeftTop);
        assert_eq!(CornerState::classify(IVec3::new(2, 0, 0), size), CornerState::RightBottom);
        assert_eq!(CornerState::classify(IVec3::new(2, 1, 0), size), CornerState::RightTop);
        assert_eq!(CornerState::classify(IVec3::new(1, 1, 0), size), CornerState::RightTop);
    }

    #[test]
    fn test_single_cell_classifies_left_bottom() {
        let size = IVec3::new(1, 1, 1);
        assert_eq!(CornerState::classify(IVec3::ZERO, size), CornerState::LeftBottom);
    }

    #[test]
    fn test_cycle_has_period_four() {
        let mut state = CornerState::Original;
        let mut visited = Vec::new();
        for _ in 0..4 {
            state = state.next_clockwise();
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                CornerState::LeftTop,
                CornerState::RightTop,
                CornerState::RightBottom,
                CornerState::LeftBottom,
            ]
        );
        assert_eq!(state.next_clockwise(), CornerState::LeftTop);
    }

    #[test]
    fn test_anchor_offsets() {
        let size = IVec3::new(4, 3, 1);
        assert_eq!(CornerState::Original.anchor_offset(size), IVec3::ZERO);
        assert_eq!(CornerState::LeftBottom.anchor_offset(size), IVec3::ZERO);
        assert_eq!(CornerState::LeftTop.anchor_offset(size), IVec3::new(0, -2, 0));
        assert_eq!(CornerState::RightTop.anchor_offset(size), IVec3::new(-3, -2, 0));
        assert_eq!(CornerState::RightBottom.anchor_offset(size), IVec3::new(-3, 0, 0));
    }

    #[test]
    fn test_index_roundtrip_and_invalid() {
        for state in [
            CornerState::Original,
            CornerState::LeftBottom,
            CornerState::LeftTop,
            CornerState::RightTop,
            CornerState::RightBottom,
        ] {
            assert_eq!(CornerState::try_from(state.index()), Ok(state));
        }
        assert_eq!(CornerState::try_from(9), Err(InvalidCornerState(9)));
    }
}
