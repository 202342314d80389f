//! Built-in message handlers
//!
//! - `SelectionHandler`: routes taps to the selection while in edit mode
//! - `MessageActionHandler`: copy, delete, rating, regenerate, stop
//! - `MemoryTranscript`: in-memory `ChatActions` backend

mod actions;
mod selection;
mod transcript;

pub use actions::{ChatActions, MessageActionHandler};
pub use selection::SelectionHandler;
pub use transcript::MemoryTranscript;
