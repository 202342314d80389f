//! Error types

use std::path::PathBuf;

use crate::event::EventName;
use crate::item::ItemId;

/// Failure reported back to the UI through an event's completion
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("'{event}' needs a target item")]
    MissingTarget { event: EventName },

    #[error("'{event}' is not available: {reason}")]
    Unsupported { event: EventName, reason: String },

    #[error("no chat item with id '{id}'")]
    NotFound { id: ItemId },

    /// Failure from an external collaborator (clipboard, network, storage)
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

/// Failure loading a session config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
