//! In-memory transcript backend

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use super::actions::ChatActions;
use crate::error::EventError;
use crate::item::{ChatItem, ItemId, MessageStatus, Rating};

/// Transcript, clipboard and ratings kept in memory
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    items: Mutex<Vec<ChatItem>>,
    clipboard: Mutex<Option<String>>,
    ratings: Mutex<HashMap<ItemId, Rating>>,
}

impl MemoryTranscript {
    pub fn new(items: Vec<ChatItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<ChatItem> {
        self.items.lock().iter().find(|item| &item.id == id).cloned()
    }

    /// Position of an item in the transcript
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.lock().iter().position(|item| &item.id == id)
    }

    pub fn items(&self) -> Vec<ChatItem> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.lock().clone()
    }

    pub fn rating(&self, id: &ItemId) -> Option<Rating> {
        self.ratings.lock().get(id).copied()
    }

    fn set_status(&self, id: &ItemId, status: MessageStatus) -> Result<(), EventError> {
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| EventError::NotFound { id: id.clone() })?;
        item.status = status;
        if status == MessageStatus::Pending {
            item.content.clear();
        }
        Ok(())
    }
}

impl ChatActions for MemoryTranscript {
    fn copy_text(&self, text: &str) -> Result<(), EventError> {
        *self.clipboard.lock() = Some(text.to_string());
        Ok(())
    }

    /// All-or-nothing: fails without deleting if any id is unknown
    fn delete_messages(&self, ids: &[ItemId]) -> Result<(), EventError> {
        let mut items = self.items.lock();
        if let Some(missing) = ids.iter().find(|id| !items.iter().any(|item| &item.id == *id)) {
            return Err(EventError::NotFound {
                id: missing.clone(),
            });
        }
        items.retain(|item| !ids.contains(&item.id));

        let mut ratings = self.ratings.lock();
        for id in ids {
            ratings.remove(id);
        }
        debug!("Transcript: removed {} item(s)", ids.len());
        Ok(())
    }

    fn rate_message(
        &self,
        id: &ItemId,
        rating: Rating,
        reason: Option<&str>,
    ) -> Result<(), EventError> {
        if self.position(id).is_none() {
            return Err(EventError::NotFound { id: id.clone() });
        }
        debug!("Transcript: {} rated {} ({:?})", id, rating, reason);
        self.ratings.lock().insert(id.clone(), rating);
        Ok(())
    }

    fn regenerate(&self, id: &ItemId) -> Result<(), EventError> {
        self.set_status(id, MessageStatus::Pending)
    }

    fn stop_generation(&self, id: &ItemId) -> Result<(), EventError> {
        self.set_status(id, MessageStatus::Stopped)
    }
}
