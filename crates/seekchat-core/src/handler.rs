//! Handler contract

use std::borrow::Cow;
use std::fmt;

use crate::event::{HandlerResult, MessageEvent};

/// Discriminant used to keep at most one handler of each kind in a chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerKind(Cow<'static, str>);

impl HandlerKind {
    pub const fn new_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for HandlerKind {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&'static str> for HandlerKind {
    fn from(s: &'static str) -> Self {
        Self::new_static(s)
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that may claim and process a message event
///
/// Returning `Unhandled` must leave shared state untouched. Side effects
/// (navigation, data mutation, network calls) belong to the `Handled` path,
/// and failures are reported through [`MessageEvent::complete`].
pub trait MessageHandler: Send + Sync {
    fn kind(&self) -> HandlerKind;
    fn handle(&self, event: &MessageEvent<'_>) -> HandlerResult;
}
