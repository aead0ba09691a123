//! Error types for playback state management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track under the path could be resolved from the collection cache
    #[error("Nothing playable under {0}")]
    EmptySelection(String),

    /// Path does not match any track of the queue item
    #[error("Track not found in queue item: {0}")]
    TrackNotFound(String),

    /// Path does not lie under the queue item's root
    #[error("Path {path} is outside queue item {item_index}")]
    PathOutsideItem { item_index: usize, path: String },

    /// Queue item index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Dispatcher subscribers wait on each other
    #[error("Dependency cycle between subscribers: {0}")]
    DependencyCycle(String),

    /// Dispatcher token does not belong to this builder
    #[error("Unknown subscriber token: {0}")]
    UnknownSubscriber(usize),

    /// Malformed wire message
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Outgoing message could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),

    /// Collection error
    #[error(transparent)]
    Core(#[from] groove_core::GrooveError),

    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
