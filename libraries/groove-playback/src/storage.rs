//! Persistence of player state
//!
//! State is kept as independent JSON values under fixed keys, the way a
//! browser client keeps it in local storage. Every key is restored on its
//! own: a missing or corrupt key falls back to its default without affecting
//! the others.

use crate::error::Result;
use crate::playlist::Playlist;
use crate::types::TrackSource;
use groove_core::{GrooveError, Track};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PLAYLIST_KEY: &str = "playlist";
pub const CURRENT_TRACK_KEY: &str = "currentTrack";
pub const CURRENT_TRACK_SOURCE_KEY: &str = "currentTrackSource";
pub const CURRENT_TIME_KEY: &str = "currentTime";
pub const PLAYING_KEY: &str = "playing";
pub const REPEAT_KEY: &str = "repeat";
pub const VOLUME_KEY: &str = "volume";
pub const VOLUME_MUTE_KEY: &str = "volumeMute";

/// String key/value store
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Open (and create if needed) the storage directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Opened state directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(GrooveError::invalid_input(format!("storage key {key:?}")).into());
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for DirectoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.file(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.file(key)?, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.file(key)?) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Everything the player restores on startup
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub playlist: Playlist,
    pub current_track: Option<Track>,
    pub current_track_source: Option<TrackSource>,
    pub current_time: f64,
    pub playing: bool,
    pub repeat: bool,
    pub volume: f32,
    pub volume_mute: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            playlist: Playlist::default(),
            current_track: None,
            current_track_source: None,
            current_time: 0.0,
            playing: false,
            repeat: false,
            volume: 0.75,
            volume_mute: false,
        }
    }
}

/// Typed access to the persisted keys
pub struct Repository {
    storage: Box<dyn KeyValueStorage>,
}

impl Repository {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted value, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Corrupt persisted value, using default");
                default
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }

    /// Restore every key, falling back to `defaults` per key
    pub fn load(&self, defaults: PersistedState) -> PersistedState {
        PersistedState {
            // decoding repairs the playlist
            playlist: self.read(PLAYLIST_KEY, defaults.playlist),
            current_track: self.read(CURRENT_TRACK_KEY, defaults.current_track),
            current_track_source: self
                .read(CURRENT_TRACK_SOURCE_KEY, defaults.current_track_source),
            current_time: self.read(CURRENT_TIME_KEY, defaults.current_time),
            playing: self.read(PLAYING_KEY, defaults.playing),
            repeat: self.read(REPEAT_KEY, defaults.repeat),
            volume: self.read(VOLUME_KEY, defaults.volume),
            volume_mute: self.read(VOLUME_MUTE_KEY, defaults.volume_mute),
        }
    }

    /// Write every key
    ///
    /// Stops at the first failing key.
    pub fn save(&mut self, state: &PersistedState) -> Result<()> {
        self.write(PLAYLIST_KEY, &state.playlist)?;
        self.write(CURRENT_TRACK_KEY, &state.current_track)?;
        self.write(CURRENT_TRACK_SOURCE_KEY, &state.current_track_source)?;
        self.write(CURRENT_TIME_KEY, &state.current_time)?;
        self.write(PLAYING_KEY, &state.playing)?;
        self.write(REPEAT_KEY, &state.repeat)?;
        self.write(VOLUME_KEY, &state.volume)?;
        self.write(VOLUME_MUTE_KEY, &state.volume_mute)?;
        Ok(())
    }

    /// Give back the underlying storage
    pub fn into_storage(self) -> Box<dyn KeyValueStorage> {
        self.storage
    }
}
