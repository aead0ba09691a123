//! Dispatcher payloads
//!
//! Every state change enters the stores as an [`Action`] wrapped in a
//! [`Payload`] that records whether it came from the user or the server.
//! The JSON form matches the wire protocol:
//!
//! ```json
//! {"source": "VIEW_ACTION", "action": {"actionType": "PLAYLIST_APPEND", "path": ["Artist"]}}
//! ```

use crate::cursor::Position;
use crate::playlist::Playlist;
use crate::types::{MediaError, TrackSource};
use groove_core::CollectionPath;
use serde::{Deserialize, Serialize};

/// Origin of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadSource {
    /// User intent from the front-end
    ViewAction,

    /// Push message from the music server
    ServerAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "actionType",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // Playlist
    PlaylistAppend {
        path: CollectionPath,
    },
    PlaylistPlayNow {
        path: CollectionPath,
    },
    PlaylistRemove {
        item_index: usize,
        path: CollectionPath,
    },
    PlaylistSetCurrent {
        item_index: usize,
        path: CollectionPath,
    },
    PlaylistNext,
    PlaylistPrev,
    PlaylistClear,
    /// Authoritative playlist pushed by the server
    PlaylistSnapshot {
        playlist: Playlist,
    },

    // Cursor
    CursorForward,
    CursorSet {
        index: usize,
        path: CollectionPath,
    },
    CursorUpdate {
        #[serde(default)]
        previous: Option<Position>,
        #[serde(default)]
        current: Option<Position>,
        #[serde(default)]
        next: Option<Position>,
    },

    /// Track picked directly in the collection browser
    SetCurrentTrack {
        path: CollectionPath,
    },

    // Playback controls
    Play,
    Pause,
    TogglePlay,
    SetRepeat {
        repeat: bool,
    },
    SetVolume {
        volume: f32,
    },
    SetMuted {
        muted: bool,
    },
    ToggleMute,
    Seek {
        position: f64,
    },

    // Media element telemetry
    Ended {
        source: TrackSource,
        #[serde(default)]
        repeat: bool,
    },
    TimeUpdate {
        current_time: f64,
    },
    DurationChange {
        duration: f64,
    },
    Progress {
        buffered: f64,
    },
    MediaError {
        error: MediaError,
    },

    /// A collection node was fetched into the cache
    CollectionLoaded {
        path: CollectionPath,
    },

    /// Any action type this client does not know
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Playlist actions that pick a new current position
    pub fn selects_playlist_position(&self) -> bool {
        matches!(
            self,
            Self::PlaylistPlayNow { .. }
                | Self::PlaylistSetCurrent { .. }
                | Self::PlaylistNext
                | Self::PlaylistPrev
        )
    }

    /// Any action handled by the playlist store
    pub fn is_playlist_action(&self) -> bool {
        matches!(
            self,
            Self::PlaylistAppend { .. }
                | Self::PlaylistPlayNow { .. }
                | Self::PlaylistRemove { .. }
                | Self::PlaylistSetCurrent { .. }
                | Self::PlaylistNext
                | Self::PlaylistPrev
                | Self::PlaylistClear
                | Self::PlaylistSnapshot { .. }
        )
    }

    /// Cursor actions the client issues on its own
    pub fn moves_cursor(&self) -> bool {
        matches!(self, Self::CursorForward | Self::CursorSet { .. })
    }
}

/// Dispatched unit: an action and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub source: PayloadSource,
    pub action: Action,
}

impl Payload {
    pub fn view(action: Action) -> Self {
        Self {
            source: PayloadSource::ViewAction,
            action,
        }
    }

    pub fn server(action: Action) -> Self {
        Self {
            source: PayloadSource::ServerAction,
            action,
        }
    }
}
