//! Groove - Playback State
//!
//! Platform-agnostic playback state for the Groove music client.
//!
//! This crate provides:
//! - Playlist of enqueued collection subtrees with one current position
//! - Cascading removal of tracks and emptied groups
//! - Three-slot cursor (server-driven navigation)
//! - Now-playing and playing-status stores
//! - A dependency-ordered action dispatcher
//! - Key/value persistence of the player state
//! - Server wire protocol with an outgoing buffer
//!
//! # Architecture
//!
//! `groove-playback` owns no I/O of its own:
//! - The collection cache is provided through [`CollectionLookup`]
//! - Persistence goes through [`KeyValueStorage`]
//! - Outgoing server messages go through [`MessageSink`]
//!
//! Every state change is an [`Action`] dispatched through a [`Player`]:
//!
//! ```text
//! Payload ─▶ playlist ─▶ cursor ─▶ now_playing ─▶ status
//!                                      │
//!                                      └─▶ follow-ups (e.g. next on ended)
//! ```
//!
//! # Example: Playlist
//!
//! ```rust
//! use groove_core::{CollectionPath, MemoryCollection, Track};
//! use groove_playback::Playlist;
//!
//! let album: CollectionPath = "/Artist/Album".parse()?;
//! let mut collection = MemoryCollection::new();
//! collection.insert_tracks(
//!     album.clone(),
//!     vec![Track::new("1", "Intro", "Artist"), Track::new("2", "Outro", "Artist")],
//! );
//!
//! let mut playlist = Playlist::new();
//! playlist.play_now(album, &collection)?;
//! assert_eq!(playlist.current_track(&collection).unwrap().id, "1");
//!
//! playlist.next();
//! assert_eq!(playlist.current_track(&collection).unwrap().id, "2");
//!
//! playlist.next();
//! assert!(playlist.current().is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example: Player session
//!
//! ```rust
//! use groove_core::{MemoryCollection, Track};
//! use groove_playback::{Action, MemoryStorage, NullSink, Player, PlayerConfig, PlayerEvent};
//!
//! let mut collection = MemoryCollection::new();
//! collection.insert_tracks("/Album".parse()?, vec![Track::new("1", "Song", "Artist")]);
//!
//! let mut player = Player::new(
//!     collection,
//!     Box::new(MemoryStorage::new()),
//!     Box::new(NullSink),
//!     PlayerConfig::default(),
//! )?;
//!
//! player.dispatch_view(Action::PlaylistPlayNow { path: "/Album".parse()? });
//! player.dispatch_view(Action::Play);
//!
//! assert_eq!(player.now_playing().track_id(), Some("1"));
//! assert!(player.drain_events().contains(&PlayerEvent::StateChanged { playing: true }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod controls;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod events;
mod handlers;
pub mod item;
pub mod now_playing;
pub mod player;
pub mod playlist;
pub mod status;
pub mod storage;
pub mod types;
pub mod volume;
pub mod wire;

// Re-exports
pub use actions::{Action, Payload, PayloadSource};
pub use controls::{BackAction, BackControl};
pub use cursor::{Cursor, Position};
pub use dispatcher::{DispatchReport, Dispatcher, DispatcherBuilder, Token};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use item::{NodeShape, QueueItem, Removal, RemovalAction};
pub use now_playing::NowPlaying;
pub use player::Player;
pub use playlist::{CurrentPosition, Playlist};
pub use status::PlayingStatus;
pub use storage::{
    DirectoryStorage, KeyValueStorage, MemoryStorage, PersistedState, Repository,
};
pub use types::{MediaError, PlayerConfig, RemovalPolicy, TrackSource};
pub use volume::Volume;
pub use wire::{MessageSink, NullSink, Outbox, WireMessage};

pub use groove_core::CollectionLookup;
