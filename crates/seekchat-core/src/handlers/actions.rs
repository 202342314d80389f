//! Message action handler
//!
//! Copy, delete, like/dislike, regenerate and stop, executed against an
//! external [`ChatActions`] backend. Outcomes go back through the event's
//! completion; the handler itself never fails.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::EventError;
use crate::event::{EventName, EventResult, HandlerResult, MessageEvent};
use crate::handler::{HandlerKind, MessageHandler};
use crate::item::{ChatItem, ItemId, Rating, Role};
use crate::payload::{keys, PayloadValue};
use crate::selection::SharedSelection;

/// Side effects the UI layer provides (clipboard, storage, generation)
pub trait ChatActions: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<(), EventError>;
    fn delete_messages(&self, ids: &[ItemId]) -> Result<(), EventError>;
    fn rate_message(&self, id: &ItemId, rating: Rating, reason: Option<&str>)
        -> Result<(), EventError>;
    fn regenerate(&self, id: &ItemId) -> Result<(), EventError>;
    fn stop_generation(&self, id: &ItemId) -> Result<(), EventError>;
}

pub struct MessageActionHandler {
    actions: Arc<dyn ChatActions>,
    /// Present when deletes may act on the multi-select set
    selection: Option<SharedSelection>,
    edit_animation: Duration,
}

impl MessageActionHandler {
    pub const KIND: HandlerKind = HandlerKind::new_static("message-actions");

    pub fn new(actions: Arc<dyn ChatActions>) -> Self {
        Self {
            actions,
            selection: None,
            edit_animation: Duration::ZERO,
        }
    }

    /// Let target-less deletes remove the current selection and leave edit mode
    pub fn with_selection(mut self, selection: SharedSelection, edit_animation: Duration) -> Self {
        self.selection = Some(selection);
        self.edit_animation = edit_animation;
        self
    }

    fn copy(&self, event: &MessageEvent<'_>) -> EventResult {
        let text = match (event.payload().value(keys::TEXT), event.target()) {
            (Some(text), _) => text.clone(),
            (None, Some(target)) => target.content.clone(),
            (None, None) => return Err(missing_target(event)),
        };
        self.actions.copy_text(&text)?;
        Ok(Some(PayloadValue::Text(text)))
    }

    fn delete(&self, event: &MessageEvent<'_>) -> EventResult {
        if let Some(target) = event.target() {
            self.actions.delete_messages(std::slice::from_ref(&target.id))?;
            if let Some(selection) = &self.selection {
                selection.lock().deselect(&target.id);
            }
            return Ok(Some(PayloadValue::Int(1)));
        }

        let ids = match event.payload().value(keys::ITEMS) {
            Some(ids) => ids.clone(),
            None => self.selected_ids(),
        };
        if ids.is_empty() {
            return Err(missing_target(event));
        }

        // Lock released while the backend runs
        self.actions.delete_messages(&ids)?;
        if let Some(selection) = &self.selection {
            let mut selection = selection.lock();
            if selection.is_editing() {
                selection.set_editing(false, self.edit_animation);
            }
        }
        debug!("Deleted {} message(s)", ids.len());
        Ok(Some(PayloadValue::Int(ids.len() as i64)))
    }

    fn rate(&self, event: &MessageEvent<'_>, rating: Rating) -> EventResult {
        let target = event.target().ok_or_else(|| missing_target(event))?;
        require_assistant(event, target)?;
        let reason = event.payload().value(keys::REASON).map(String::as_str);
        self.actions.rate_message(&target.id, rating, reason)?;
        Ok(None)
    }

    fn regenerate(&self, event: &MessageEvent<'_>) -> EventResult {
        let target = event.target().ok_or_else(|| missing_target(event))?;
        require_assistant(event, target)?;
        if target.is_generating() {
            return Err(unsupported(event, "reply is still generating"));
        }
        self.actions.regenerate(&target.id)?;
        Ok(None)
    }

    fn stop(&self, event: &MessageEvent<'_>) -> EventResult {
        let target = event.target().ok_or_else(|| missing_target(event))?;
        if !target.is_generating() {
            return Err(unsupported(event, "nothing is generating"));
        }
        self.actions.stop_generation(&target.id)?;
        Ok(None)
    }

    fn selected_ids(&self) -> Vec<ItemId> {
        match &self.selection {
            Some(selection) => {
                let selection = selection.lock();
                if selection.is_editing() {
                    selection.selected_sorted()
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }
}

impl MessageHandler for MessageActionHandler {
    fn kind(&self) -> HandlerKind {
        Self::KIND
    }

    fn handle(&self, event: &MessageEvent<'_>) -> HandlerResult {
        let result = match event.name() {
            EventName::Copy => self.copy(event),
            EventName::Delete => self.delete(event),
            EventName::Like => self.rate(event, Rating::Like),
            EventName::Dislike => self.rate(event, Rating::Dislike),
            EventName::Regenerate => self.regenerate(event),
            EventName::StopGenerate => self.stop(event),
            _ => return HandlerResult::Unhandled,
        };

        if let Err(e) = &result {
            warn!("Message action '{}' failed: {}", event.name(), e);
        }
        event.complete(result);
        HandlerResult::Handled
    }
}

fn missing_target(event: &MessageEvent<'_>) -> EventError {
    EventError::MissingTarget {
        event: event.name().clone(),
    }
}

fn unsupported(event: &MessageEvent<'_>, reason: &str) -> EventError {
    EventError::Unsupported {
        event: event.name().clone(),
        reason: reason.to_string(),
    }
}

fn require_assistant(event: &MessageEvent<'_>, target: &ChatItem) -> Result<(), EventError> {
    if target.role == Role::Assistant {
        Ok(())
    } else {
        Err(unsupported(event, "only assistant replies support this"))
    }
}
