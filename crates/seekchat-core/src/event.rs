//! Message events
//!
//! Interactions raised by the transcript view against a chat item.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::EventError;
use crate::item::{ChatItem, ItemLayout};
use crate::payload::{Payload, PayloadValue};

/// Name of an interaction
///
/// Well-known names have dedicated variants; anything else is `Custom`.
/// Equality and hashing go through [`EventName::as_str`], so
/// `Custom("tap")` and `Tap` are the same event name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventName {
    Tap,
    LongPress,
    Select,
    Delete,
    Copy,
    Like,
    Dislike,
    Regenerate,
    StopGenerate,
    Custom(String),
}

impl EventName {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Turn a `Custom` that spells a well-known name into that variant
    pub fn normalize(self) -> Self {
        match self {
            EventName::Custom(name) => EventName::from(name),
            other => other,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventName::Tap => "tap",
            EventName::LongPress => "longPress",
            EventName::Select => "select",
            EventName::Delete => "delete",
            EventName::Copy => "copy",
            EventName::Like => "like",
            EventName::Dislike => "dislike",
            EventName::Regenerate => "regen",
            EventName::StopGenerate => "stopGenerate",
            EventName::Custom(name) => name,
        }
    }

    fn well_known(name: &str) -> Option<Self> {
        let known = match name {
            "tap" => EventName::Tap,
            "longPress" => EventName::LongPress,
            "select" => EventName::Select,
            "delete" => EventName::Delete,
            "copy" => EventName::Copy,
            "like" => EventName::Like,
            "dislike" => EventName::Dislike,
            "regen" => EventName::Regenerate,
            "stopGenerate" => EventName::StopGenerate,
            _ => return None,
        };
        Some(known)
    }
}

impl PartialEq for EventName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EventName {}

impl Hash for EventName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<&str> for EventName {
    fn from(s: &str) -> Self {
        Self::well_known(s).unwrap_or_else(|| EventName::Custom(s.to_string()))
    }
}

impl From<String> for EventName {
    fn from(s: String) -> Self {
        Self::well_known(&s).unwrap_or(EventName::Custom(s))
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        match name {
            EventName::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported through an event's completion
pub type EventResult = Result<Option<PayloadValue>, EventError>;

/// Callback the UI attaches to learn how an event turned out
#[derive(Clone)]
pub struct Completion(Arc<dyn Fn(EventResult) + Send + Sync>);

impl Completion {
    pub fn new(f: impl Fn(EventResult) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, result: EventResult) {
        (self.0)(result)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Completion(..)")
    }
}

/// Whether a handler took ownership of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    Handled,
    Unhandled,
}

impl HandlerResult {
    pub fn is_handled(self) -> bool {
        self == HandlerResult::Handled
    }
}

/// A single interaction against a chat item
///
/// Built once per gesture, dispatched synchronously, then dropped.
/// The target item is borrowed for the duration of dispatch. The name is
/// normalized on construction so handlers can match on variants.
#[derive(Debug, Clone)]
pub struct MessageEvent<'a> {
    name: EventName,
    target: Option<&'a ChatItem>,
    position: Option<usize>,
    layout: Option<ItemLayout>,
    completion: Option<Completion>,
    payload: Cow<'a, Payload>,
}

impl<'a> MessageEvent<'a> {
    pub fn new(name: impl Into<EventName>) -> Self {
        Self {
            name: name.into().normalize(),
            target: None,
            position: None,
            layout: None,
            completion: None,
            payload: Cow::Owned(Payload::new()),
        }
    }

    pub fn with_target(mut self, target: &'a ChatItem) -> Self {
        self.target = Some(target);
        self
    }

    /// Index of the target within its list
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_layout(mut self, layout: ItemLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Cow::Owned(payload);
        self
    }

    /// Borrow a payload owned by the caller instead of moving it in
    pub fn with_payload_ref(mut self, payload: &'a Payload) -> Self {
        self.payload = Cow::Borrowed(payload);
        self
    }

    pub fn name(&self) -> &EventName {
        &self.name
    }

    pub fn target(&self) -> Option<&'a ChatItem> {
        self.target
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn layout(&self) -> Option<ItemLayout> {
        self.layout
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Report the outcome to the UI. No-op when no completion is attached.
    pub fn complete(&self, result: EventResult) {
        if let Some(completion) = &self.completion {
            completion.call(result);
        }
    }
}
