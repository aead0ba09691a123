//! Player events
//!
//! Change notifications queued while a payload is dispatched and drained by
//! the front-end, which then re-reads whatever store getters it renders.

use serde::{Deserialize, Serialize};

/// Events emitted by the player stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playing flag changed
    StateChanged { playing: bool },

    /// Now-playing track identity changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: Option<String>,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Playlist items or current position changed
    PlaylistChanged {
        /// Number of queue items
        length: usize,
    },

    /// Cursor slots changed
    CursorChanged,

    /// Playing status telemetry was zeroed for a new track
    StatusReset,

    /// The media element should seek
    SeekRequested {
        /// Target position in seconds
        position: f64,
    },

    VolumeChanged { volume: f32, muted: bool },

    RepeatChanged { repeat: bool },

    /// A navigation request could not be resolved and was dropped
    NavigationFailed { message: String },

    /// Media element reported an error
    Error { message: String },
}
