//! Selection handler - taps become selection toggles in edit mode

use std::time::Duration;

use crate::event::{EventName, HandlerResult, MessageEvent};
use crate::handler::{HandlerKind, MessageHandler};
use crate::payload::{keys, PayloadValue};
use crate::selection::SharedSelection;

pub struct SelectionHandler {
    selection: SharedSelection,
    edit_animation: Duration,
}

impl SelectionHandler {
    pub const KIND: HandlerKind = HandlerKind::new_static("selection");

    pub fn new(selection: SharedSelection, edit_animation: Duration) -> Self {
        Self {
            selection,
            edit_animation,
        }
    }
}

impl MessageHandler for SelectionHandler {
    fn kind(&self) -> HandlerKind {
        Self::KIND
    }

    fn handle(&self, event: &MessageEvent<'_>) -> HandlerResult {
        let Some(target) = event.target() else {
            return HandlerResult::Unhandled;
        };

        // Guard dropped before completion so the UI can read the selection
        let selected = {
            let mut selection = self.selection.lock();
            match event.name() {
                EventName::Tap | EventName::Select | EventName::LongPress
                    if selection.is_editing() =>
                {
                    selection.toggle_selection(&target.id)
                }
                EventName::Select => {
                    // Entering edit mode from a "select" menu action
                    let duration = match event.payload().value(keys::ANIMATED) {
                        Some(false) => Duration::ZERO,
                        _ => self.edit_animation,
                    };
                    selection.set_editing(true, duration);
                    selection.select(&target.id);
                    true
                }
                _ => return HandlerResult::Unhandled,
            }
        };

        event.complete(Ok(Some(PayloadValue::Bool(selected))));
        HandlerResult::Handled
    }
}
