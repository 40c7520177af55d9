use std::path::PathBuf;

use bevy::prelude::*;

/// Message to add the current clipboard item to Favorites
#[derive(Message)]
pub struct AddFavoriteRequest;

#[derive(Message)]
pub struct RemoveFavoriteRequest {
    pub index: usize,
}

#[derive(Message)]
pub struct ClearFavoritesRequest;

/// Message to make a favorite the current clipboard item
#[derive(Message)]
pub struct PickFavoriteRequest {
    pub index: usize,
}

/// Message to save Favorites; `None` uses the configured file
#[derive(Message, Default)]
pub struct SaveFavoritesRequest {
    pub path: Option<PathBuf>,
}

/// Message to load Favorites; `None` uses the configured file
#[derive(Message, Default)]
pub struct LoadFavoritesRequest {
    pub path: Option<PathBuf>,
}
