//! Clipboard: the selection the editor currently paints with.
//!
//! ## Module Structure
//!
//! - [`item`] - ClipboardItem and its variants
//! - [`session`] - Sequence and diagnostic counters
//! - [`messages`] - Requests and change notifications
//! - [`systems`] - CurrentClipboard resource and request handlers
//! - [`preview`] - Background prefab preview loading

mod item;
mod messages;
mod preview;
mod session;
mod systems;


pub use item::{
    ApplyFlags, ClipboardContent, ClipboardItem, ClipboardTarget, ItemIcon, ItemVariety,
    MultiTileSelection, MutationOutcome, PrefabSelection, TilePick, TileSelection,
};
pub use messages::{
    ApplyColorRequest, ApplyTransformRequest, ClipboardChanged, FlipClipboardRequest,
    LoadPrefabPreviewRequest, ResetClipboardRequest, RotateClipboardRequest, RotatePivotRequest,
    SetClipboardRequest,
};
pub use preview::{apply_preview_if_current, load_preview_image, PrefabPreviewTask};
pub use session::ClipboardSession;
pub use systems::CurrentClipboard;

use bevy::prelude::*;

pub struct ClipboardPlugin;

impl Plugin for ClipboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClipboardSession>()
            .init_resource::<CurrentClipboard>()
            .add_message::<SetClipboardRequest>()
            .add_message::<ResetClipboardRequest>()
            .add_message::<ApplyTransformRequest>()
            .add_message::<ApplyColorRequest>()
            .add_message::<RotateClipboardRequest>()
            .add_message::<FlipClipboardRequest>()
            .add_message::<RotatePivotRequest>()
            .add_message::<LoadPrefabPreviewRequest>()
            .add_message::<ClipboardChanged>()
            .add_systems(
                Update,
                (
                    systems::set_clipboard_system.run_if(on_message::<SetClipboardRequest>),
                    systems::reset_clipboard_system.run_if(on_message::<ResetClipboardRequest>),
                    systems::apply_transform_system.run_if(on_message::<ApplyTransformRequest>),
                    systems::apply_color_system.run_if(on_message::<ApplyColorRequest>),
                    systems::rotate_clipboard_system.run_if(on_message::<RotateClipboardRequest>),
                    systems::flip_clipboard_system.run_if(on_message::<FlipClipboardRequest>),
                    systems::rotate_pivot_system.run_if(on_message::<RotatePivotRequest>),
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    preview::start_prefab_preview_system
                        .run_if(on_message::<LoadPrefabPreviewRequest>),
                    preview::poll_prefab_preview_tasks,
                ),
            );
    }
}
