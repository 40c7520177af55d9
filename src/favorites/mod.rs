//! Favorites: a short, persisted list of clipboard items worth keeping.
//!
//! ## Module Structure
//!
//! - [`store`] - FavoritesStore resource and the favorite types
//! - [`icon`] - Icon synthesis for multi-cell favorites
//! - [`saved`] - Serialized form of the favorites file
//! - [`messages`] - Requests handled by the favorites systems
//! - [`systems`] - Request handlers, persistence and icon export

mod icon;
mod messages;
mod saved;
mod store;
mod systems;

#[cfg(test)]
mod tests;

pub use icon::{canvas_size_for, synthesize_icon, IconError, SynthesizedIcon};
pub use messages::{
    AddFavoriteRequest, ClearFavoritesRequest, LoadFavoritesRequest, PickFavoriteRequest,
    RemoveFavoriteRequest, SaveFavoritesRequest,
};
pub use saved::{
    array_to_color, color_to_array, SavedCell, SavedCellBundle, SavedFavorites, SavedTileRef,
    FAVORITES_FORMAT_VERSION,
};
pub use store::{CellBundle, Favorite, FavoritesError, FavoritesStore};
pub use systems::{FavoritesErrorMessage, IconExportTask};

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct FavoritesPlugin;

impl Plugin for FavoritesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FavoritesStore>()
            .init_resource::<FavoritesErrorMessage>()
            .add_message::<AddFavoriteRequest>()
            .add_message::<RemoveFavoriteRequest>()
            .add_message::<ClearFavoritesRequest>()
            .add_message::<PickFavoriteRequest>()
            .add_message::<SaveFavoritesRequest>()
            .add_message::<LoadFavoritesRequest>()
            .add_systems(
                Startup,
                systems::load_favorites_on_startup.after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    systems::load_favorites_system.run_if(on_message::<LoadFavoritesRequest>),
                    systems::add_favorite_system.run_if(on_message::<AddFavoriteRequest>),
                    systems::remove_favorite_system.run_if(on_message::<RemoveFavoriteRequest>),
                    systems::clear_favorites_system.run_if(on_message::<ClearFavoritesRequest>),
                    systems::pick_favorite_system.run_if(on_message::<PickFavoriteRequest>),
                    systems::save_favorites_system.run_if(on_message::<SaveFavoritesRequest>),
                )
                    .chain(),
            )
            .add_systems(Update, systems::poll_icon_export_tasks);
    }
}
