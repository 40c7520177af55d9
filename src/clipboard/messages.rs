use bevy::prelude::*;
use uuid::Uuid;

use super::item::{ApplyFlags, ClipboardItem, ItemVariety};

/// Message to make an item the current clipboard item
#[derive(Message)]
pub struct SetClipboardRequest(pub ClipboardItem);

/// Message to clear the current clipboard item
#[derive(Message)]
pub struct ResetClipboardRequest;

#[derive(Message)]
pub struct ApplyTransformRequest {
    pub transform: Mat4,
    pub flags: ApplyFlags,
}

#[derive(Message)]
pub struct ApplyColorRequest {
    pub color: Color,
    pub flags: ApplyFlags,
}

#[derive(Message)]
pub struct RotateClipboardRequest {
    pub ccw: bool,
    /// Rotate a multi-cell item as a block instead of each cell in place
    pub affects_group: bool,
}

#[derive(Message)]
pub struct FlipClipboardRequest {
    pub flip_x: bool,
    pub affects_group: bool,
}

/// Message to move the paint anchor of a multi-cell item to the next corner
#[derive(Message)]
pub struct RotatePivotRequest;

/// Message to load the preview image of the current prefab item
#[derive(Message)]
pub struct LoadPrefabPreviewRequest;

/// Sent whenever the current clipboard item is replaced or edited
#[derive(Message, Debug, Clone)]
pub struct ClipboardChanged {
    pub identity: Uuid,
    pub sequence_index: u64,
    pub variety: ItemVariety,
    /// The edit touched tiles that asked not to be edited that way
    pub lock_warning: bool,
}

impl ClipboardChanged {
    pub fn for_item(item: &ClipboardItem, lock_warning: bool) -> Self {
        Self {
            identity: item.identity(),
            sequence_index: item.sequence_index(),
            variety: item.variety(),
            lock_warning,
        }
    }
}
