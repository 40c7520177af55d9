//! Cell grid transform engine for multi-tile selections.
//!
//! A multi-tile selection is a rectangular block of [`TileCell`]s around a
//! pivot. This module rotates and flips such blocks as a unit, tracks which
//! corner the pivot sits on, and computes the offset used to paint the
//! block anchored at that corner.
//!
//! ## Module Structure
//!
//! - [`bounds`] - Integer bounding boxes
//! - [`cell`] - TileCell, one position of a selection
//! - [`brush`] - Brush trait and GridBrush, the rectangular transform buffer
//! - [`corner`] - CornerState classification, cycling and anchor offsets
//! - [`engine`] - CellGrid, atomic and per-cell rotate/flip

mod bounds;
mod brush;
mod cell;
mod corner;
mod engine;


pub use bounds::{GridBounds, SavedBounds};
pub use brush::{Brush, BrushCell, FlipAxis, GridBrush, RotationDirection};
pub use cell::{TileCell, TilePayload};
pub use corner::{CornerState, InvalidCornerState};
pub use engine::CellGrid;
