//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

use bevy::math::IVec3;

/// Hard capacity of the favorites list
pub const MAX_FAVORITES: usize = 32;

/// Maximum number of recently used favorites files to remember in config
pub const MAX_RECENT_FILES: usize = 5;

/// Grid position used for tile selections that came from Favorites rather
/// than from a tilemap. A tile item at this position is valid without a
/// source tilemap.
pub const IMPOSSIBLE_POSITION: IVec3 = IVec3::new(i32::MIN, i32::MIN, i32::MIN);

/// Above this many eligible cells, icon synthesis returns the placeholder.
pub const MAX_ICON_COMBINE_CELLS: usize = 512;

/// Granularity cap for the icon grid, in cells per axis.
pub const MAX_ICON_GRID_CELLS: i32 = 64;

/// Output canvas edge lengths for combined icons, smallest first.
pub const ICON_CANVAS_SIZES: [u32; 3] = [64, 128, 256];

/// Default timeout for I/O tasks (preview loads, icon exports), in seconds.
pub const DEFAULT_IO_TIMEOUT_SECS: f32 = 5.0;
