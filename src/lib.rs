//! Editor core for painting on tile grids.
//!
//! Holds the current selection (the clipboard), transforms multi-cell
//! selections as a block, and keeps a persisted list of favorites.
//!
//! ## Module Structure
//!
//! - [`tiles`] - Tile capability probe and tile library
//! - [`grid`] - Cells, brush and the block rotate/flip engine
//! - [`assets`] - Asset references and the asset database
//! - [`clipboard`] - Clipboard items, session counters and request systems
//! - [`favorites`] - Favorites store, icon synthesis and persistence
//! - [`config`] - Persisted application settings
//! - [`tasks`] - Timed I/O tasks
//! - [`paths`] - Platform directories

pub mod assets;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod favorites;
pub mod grid;
pub mod paths;
pub mod tasks;
pub mod tiles;

use bevy::prelude::*;

/// All tilekit plugins in dependency order
pub struct TileKitPlugin;

impl Plugin for TileKitPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(config::ConfigPlugin)
            .add_plugins(assets::AssetsPlugin)
            .add_plugins(clipboard::ClipboardPlugin)
            .add_plugins(favorites::FavoritesPlugin);
    }
}
