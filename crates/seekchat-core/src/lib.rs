//! Seekchat core library
//!
//! Message interaction plumbing for the chat client:
//! - `event`: interaction events raised against chat items
//! - `chain`: ordered, kind-unique handler registry with interrupt/broadcast dispatch
//! - `selection`: edit-mode and multi-select state with weakly-held observers
//! - `handlers`: built-in handlers for selection and message actions
//! - `session`: per-conversation assembly of the above

pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod handlers;
pub mod item;
pub mod payload;
pub mod selection;
pub mod session;

pub use chain::{DispatchMode, HandlerChain};
pub use config::SessionConfig;
pub use error::{ConfigError, EventError};
pub use event::{Completion, EventName, EventResult, HandlerResult, MessageEvent};
pub use handler::{HandlerKind, MessageHandler};
pub use handlers::{ChatActions, MemoryTranscript, MessageActionHandler, SelectionHandler};
pub use item::{ChatItem, ItemId, ItemLayout, MessageStatus, Rating, Role};
pub use payload::{Payload, PayloadKey, PayloadValue};
pub use selection::{SelectionNotifier, SelectionObserver, SharedSelection};
pub use session::ChatSession;
