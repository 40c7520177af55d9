//! Background loading of prefab preview images.
//!
//! The preview sits next to the prefab as `<path>.preview.png`. Loading runs
//! on the `IoTaskPool` with the configured I/O timeout; when it finishes the
//! image is only applied if the same clipboard item is still current.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use image::RgbaImage;
use uuid::Uuid;

use crate::assets::{decode_png, read_bytes, AssetError, LocalAssetDatabase};
use crate::config::AppConfig;
use crate::tasks::{TaskPoll, TimedTask};

use super::item::ClipboardItem;
use super::messages::{ClipboardChanged, LoadPrefabPreviewRequest};
use super::systems::CurrentClipboard;

pub struct PreviewResult {
    pub path: PathBuf,
    pub image: Result<RgbaImage, AssetError>,
}

/// Component for an in-flight preview load
#[derive(Component)]
pub struct PrefabPreviewTask {
    identity: Uuid,
    sequence_index: u64,
    task: TimedTask<Task<PreviewResult>>,
}

pub fn load_preview_image(path: &Path) -> Result<RgbaImage, AssetError> {
    decode_png(&read_bytes(path)?)
}

/// Set the preview if `item` is still the one the load was started for
pub fn apply_preview_if_current(
    item: &mut ClipboardItem,
    identity: Uuid,
    sequence_index: u64,
    image: RgbaImage,
) -> bool {
    if item.identity() != identity || item.sequence_index() != sequence_index {
        return false;
    }
    item.set_prefab_preview(Arc::new(image))
}

pub fn start_prefab_preview_system(
    mut commands: Commands,
    mut events: MessageReader<LoadPrefabPreviewRequest>,
    clipboard: Res<CurrentClipboard>,
    database: Res<LocalAssetDatabase>,
    config: Res<AppConfig>,
    time: Res<Time>,
) {
    for _ in events.read() {
        let Some(prefab) = clipboard.item.prefab_selection() else {
            debug!("Preview requested but the clipboard holds no prefab");
            continue;
        };
        if prefab.preview().is_some() {
            continue;
        }

        let path = database.resolve(Path::new(&prefab.asset.preview_path()));
        let task = IoTaskPool::get().spawn(async move {
            let image = load_preview_image(&path);
            PreviewResult { path, image }
        });

        commands.spawn(PrefabPreviewTask {
            identity: clipboard.item.identity(),
            sequence_index: clipboard.item.sequence_index(),
            task: TimedTask::new(task, time.elapsed(), config.io_timeout()),
        });
    }
}

pub fn poll_prefab_preview_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut PrefabPreviewTask)>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
    time: Res<Time>,
) {
    for (entity, mut pending) in tasks.iter_mut() {
        match pending.task.poll(time.elapsed()) {
            TaskPoll::Pending => continue,
            TaskPoll::Ready(result) => match result.image {
                Ok(image) => {
                    if apply_preview_if_current(
                        &mut clipboard.item,
                        pending.identity,
                        pending.sequence_index,
                        image,
                    ) {
                        info!("Loaded prefab preview {:?}", result.path);
                        changed.write(ClipboardChanged::for_item(&clipboard.item, false));
                    } else {
                        debug!("Dropped preview {:?}: clipboard item changed", result.path);
                    }
                }
                Err(e) => warn!("Failed to load prefab preview: {}", e),
            },
            TaskPoll::TimedOut => warn!("Prefab preview load timed out"),
            TaskPoll::Finished => {}
        }
        commands.entity(entity).despawn();
    }
}
