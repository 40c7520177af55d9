//! Asset access for the editor core.
//!
//! ## Module Structure
//!
//! - [`asset_ref`] - Path references to tiles, prefabs, bundles and tile-fabs
//! - [`database`] - AssetDatabase trait and its file-system implementation
//! - [`placeholder`] - Red X icon used when no real icon is available

mod asset_ref;
mod database;
mod placeholder;

pub use asset_ref::{AssetKind, AssetRef};
pub use database::{
    decode_png, encode_png, read_bytes, write_bytes, AssetDatabase, AssetError, LocalAssetDatabase,
};
pub use placeholder::{create_placeholder_image, PlaceholderIcon, PLACEHOLDER_SIZE};

use bevy::prelude::*;

use crate::tiles::TileLibrary;

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        let root = crate::paths::data_dir().unwrap_or_else(|| ".".into());
        app.insert_resource(LocalAssetDatabase::new(root))
            .init_resource::<TileLibrary>()
            .init_resource::<PlaceholderIcon>();
    }
}
