//! Systems applying clipboard requests to the current item.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::item::{ClipboardItem, MutationOutcome};
use super::messages::{
    ApplyColorRequest, ApplyTransformRequest, ClipboardChanged, FlipClipboardRequest,
    ResetClipboardRequest, RotateClipboardRequest, RotatePivotRequest, SetClipboardRequest,
};
use super::session::ClipboardSession;

/// Resource holding the item the editor paints with
#[derive(Resource, Debug, Default)]
pub struct CurrentClipboard {
    pub item: ClipboardItem,
}

impl CurrentClipboard {
    /// Swap in a new item; the old one is handed back to the session
    pub fn replace(&mut self, item: ClipboardItem, session: &mut ClipboardSession) {
        let old = std::mem::replace(&mut self.item, item);
        session.discard(old);
    }
}

fn notify(changed: &mut MessageWriter<ClipboardChanged>, item: &ClipboardItem, outcome: MutationOutcome) {
    if outcome.changed() {
        changed.write(ClipboardChanged::for_item(
            item,
            outcome == MutationOutcome::AppliedWithLockWarning,
        ));
    }
}

/// Items are moved out of the messages, so this drains them
pub fn set_clipboard_system(
    mut requests: ResMut<Messages<SetClipboardRequest>>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut session: ResMut<ClipboardSession>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for SetClipboardRequest(item) in requests.drain() {
        if !item.is_valid() {
            warn!("Clipboard set to an invalid {:?} item", item.variety());
        }
        debug!("Clipboard: {} (#{})", item.target_name(), item.sequence_index());
        clipboard.replace(item, &mut session);
        changed.write(ClipboardChanged::for_item(&clipboard.item, false));
    }
}

pub fn reset_clipboard_system(
    mut events: MessageReader<ResetClipboardRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for _ in events.read() {
        clipboard.item.reset();
        changed.write(ClipboardChanged::for_item(&clipboard.item, false));
    }
}

pub fn apply_transform_system(
    mut events: MessageReader<ApplyTransformRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for event in events.read() {
        let outcome = clipboard.item.apply_transform(event.transform, event.flags);
        notify(&mut changed, &clipboard.item, outcome);
    }
}

pub fn apply_color_system(
    mut events: MessageReader<ApplyColorRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for event in events.read() {
        let outcome = clipboard.item.apply_color(event.color, event.flags);
        notify(&mut changed, &clipboard.item, outcome);
    }
}

pub fn rotate_clipboard_system(
    mut events: MessageReader<RotateClipboardRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for event in events.read() {
        let outcome = clipboard.item.rotate(event.ccw, event.affects_group);
        if outcome == MutationOutcome::Unchanged {
            debug!("Clipboard item {:?} can't be rotated", clipboard.item.variety());
        }
        notify(&mut changed, &clipboard.item, outcome);
    }
}

pub fn flip_clipboard_system(
    mut events: MessageReader<FlipClipboardRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for event in events.read() {
        let outcome = clipboard.item.flip(event.flip_x, event.affects_group);
        notify(&mut changed, &clipboard.item, outcome);
    }
}

pub fn rotate_pivot_system(
    mut events: MessageReader<RotatePivotRequest>,
    mut clipboard: ResMut<CurrentClipboard>,
    mut changed: MessageWriter<ClipboardChanged>,
) {
    for _ in events.read() {
        if clipboard.item.rotate_pivot() {
            changed.write(ClipboardChanged::for_item(&clipboard.item, false));
        }
    }
}
