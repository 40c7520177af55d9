//! Systems handling favorites requests, persistence and icon export.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use uuid::Uuid;

use crate::assets::{write_bytes, AssetError, LocalAssetDatabase, PlaceholderIcon};
use crate::clipboard::{ClipboardSession, CurrentClipboard, SetClipboardRequest};
use crate::config::{AddRecentFavoritesFileRequest, AppConfig};
use crate::tasks::{TaskPoll, TimedTask};
use crate::tiles::TileLibrary;

use super::messages::{
    AddFavoriteRequest, ClearFavoritesRequest, LoadFavoritesRequest, PickFavoriteRequest,
    RemoveFavoriteRequest, SaveFavoritesRequest,
};
use super::store::{Favorite, FavoritesStore};

/// Resource holding the last favorites error for display
#[derive(Resource, Default)]
pub struct FavoritesErrorMessage {
    pub message: Option<String>,
}

/// Component for an in-flight icon export
#[derive(Component)]
pub struct IconExportTask(pub TimedTask<Task<Result<PathBuf, AssetError>>>);

fn write_icon_file(path: PathBuf, png: Vec<u8>) -> Result<PathBuf, AssetError> {
    write_bytes(&path, &png)?;
    Ok(path)
}

/// Startup system loading the configured favorites file
pub fn load_favorites_on_startup(mut load_events: MessageWriter<LoadFavoritesRequest>) {
    load_events.write(LoadFavoritesRequest::default());
}

#[allow(clippy::too_many_arguments)]
pub fn add_favorite_system(
    mut commands: Commands,
    mut events: MessageReader<AddFavoriteRequest>,
    clipboard: Res<CurrentClipboard>,
    mut store: ResMut<FavoritesStore>,
    mut database: ResMut<LocalAssetDatabase>,
    placeholder: Res<PlaceholderIcon>,
    config: Res<AppConfig>,
    time: Res<Time>,
    mut error_message: ResMut<FavoritesErrorMessage>,
    mut save_events: MessageWriter<SaveFavoritesRequest>,
) {
    let mut added = false;
    for _ in events.read() {
        match store.add_clipboard_item(&clipboard.item, &mut *database, &placeholder) {
            Ok(()) => {
                added = true;
                error_message.message = None;
                if config.data.export_favorite_icons
                    && let Some(Favorite::Cells(bundle)) = store.get(0)
                    && let Some(png) = bundle.icon_png.clone()
                {
                    let path = database.resolve(
                        &crate::paths::icons_dir().join(format!("favorite_{}.png", Uuid::new_v4())),
                    );
                    let task = IoTaskPool::get().spawn(async move { write_icon_file(path, png) });
                    commands.spawn(IconExportTask(TimedTask::new(
                        task,
                        time.elapsed(),
                        config.io_timeout(),
                    )));
                }
            }
            Err(e) => {
                warn!("Could not add favorite: {}", e);
                error_message.message = Some(format!("Could not add favorite: {}", e));
            }
        }
    }

    let restored = store.flush_forced_textures(&mut *database);
    if restored > 0 {
        debug!("Restored {} textures after icon synthesis", restored);
    }
    if added {
        save_events.write(SaveFavoritesRequest::default());
    }
}

pub fn poll_icon_export_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut IconExportTask)>,
    time: Res<Time>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        match task.0.poll(time.elapsed()) {
            TaskPoll::Pending => continue,
            TaskPoll::Ready(Ok(path)) => info!("Exported favorite icon to {:?}", path),
            TaskPoll::Ready(Err(e)) => warn!("Failed to export favorite icon: {}", e),
            TaskPoll::TimedOut => warn!("Favorite icon export timed out"),
            TaskPoll::Finished => {}
        }
        commands.entity(entity).despawn();
    }
}

pub fn remove_favorite_system(
    mut events: MessageReader<RemoveFavoriteRequest>,
    mut store: ResMut<FavoritesStore>,
    mut save_events: MessageWriter<SaveFavoritesRequest>,
) {
    for event in events.read() {
        match store.remove(event.index) {
            Some(favorite) => {
                info!("Removed '{}' from favorites", favorite.name());
                save_events.write(SaveFavoritesRequest::default());
            }
            None => warn!("No favorite at index {}", event.index),
        }
    }
}

pub fn clear_favorites_system(
    mut events: MessageReader<ClearFavoritesRequest>,
    mut store: ResMut<FavoritesStore>,
    mut save_events: MessageWriter<SaveFavoritesRequest>,
) {
    for _ in events.read() {
        store.clear();
        info!("Cleared favorites");
        save_events.write(SaveFavoritesRequest::default());
    }
}

pub fn pick_favorite_system(
    mut events: MessageReader<PickFavoriteRequest>,
    store: Res<FavoritesStore>,
    mut session: ResMut<ClipboardSession>,
    mut clipboard_events: MessageWriter<SetClipboardRequest>,
) {
    for event in events.read() {
        match store.to_clipboard_item(event.index, &mut session) {
            Some(item) => {
                clipboard_events.write(SetClipboardRequest(item));
            }
            None => warn!("Favorite {} can't be picked", event.index),
        }
    }
}

pub fn save_favorites_system(
    mut events: MessageReader<SaveFavoritesRequest>,
    store: Res<FavoritesStore>,
    mut database: ResMut<LocalAssetDatabase>,
    config: Res<AppConfig>,
    mut error_message: ResMut<FavoritesErrorMessage>,
    mut recent_events: MessageWriter<AddRecentFavoritesFileRequest>,
) {
    // Several requests in one frame save the same state, so only the last
    // path matters
    let Some(event) = events.read().last() else {
        return;
    };
    let path = event.path.clone().unwrap_or_else(|| config.favorites_path());

    match store.save(&mut *database, &path) {
        Ok(()) => {
            error_message.message = None;
            recent_events.write(AddRecentFavoritesFileRequest { path });
        }
        Err(e) => {
            error!("Failed to save favorites: {}", e);
            error_message.message = Some(format!("Failed to save favorites: {}", e));
        }
    }
}

pub fn load_favorites_system(
    mut events: MessageReader<LoadFavoritesRequest>,
    mut store: ResMut<FavoritesStore>,
    database: Res<LocalAssetDatabase>,
    library: Res<TileLibrary>,
    config: Res<AppConfig>,
    mut error_message: ResMut<FavoritesErrorMessage>,
) {
    for event in events.read() {
        let path = event.path.clone().unwrap_or_else(|| config.favorites_path());
        match FavoritesStore::load(&*database, &path, &library) {
            Ok(loaded) => {
                *store = loaded;
                error_message.message = None;
            }
            Err(e) => {
                error!("Failed to load favorites from {:?}: {}", path, e);
                error_message.message = Some(format!("Failed to load favorites: {}", e));
            }
        }
    }
}
