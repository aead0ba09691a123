//! Core types for playback state management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the now-playing track was selected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    /// Clicked directly in the collection browser
    Collection,

    /// Current position of the playlist
    Playlist,

    /// Server-driven cursor
    Cursor,
}

/// How `Playlist::remove` treats the current position after a partial removal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Always clear the current position
    #[default]
    InvalidateAlways,

    /// Clear it only when the removed subtree contains it
    InvalidateAffected,
}

/// Media element failure reported by the platform player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaError {
    /// Platform error code (`MEDIA_ERR_*` in browsers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,

    pub message: String,
}

impl MediaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Configuration for the player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Removal policy for the current position (default: InvalidateAlways)
    pub removal_policy: RemovalPolicy,

    /// Volume used when nothing was persisted (0.0-1.0, default: 0.75)
    pub default_volume: f32,

    /// Window for the double-press "back" gesture in milliseconds (default: 1000)
    pub back_double_press_ms: u64,
}

impl PlayerConfig {
    pub fn back_window(&self) -> Duration {
        Duration::from_millis(self.back_double_press_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::InvalidateAlways,
            default_volume: 0.75,
            back_double_press_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.removal_policy, RemovalPolicy::InvalidateAlways);
        assert_eq!(config.default_volume, 0.75);
        assert_eq!(config.back_window(), Duration::from_secs(1));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"removal_policy": "invalidate_affected"}"#).unwrap();
        assert_eq!(config.removal_policy, RemovalPolicy::InvalidateAffected);
        assert_eq!(config.back_double_press_ms, 1000);
    }

    #[test]
    fn track_source_wire_names() {
        assert_eq!(serde_json::to_string(&TrackSource::Cursor).unwrap(), r#""cursor""#);
        let source: TrackSource = serde_json::from_str(r#""playlist""#).unwrap();
        assert_eq!(source, TrackSource::Playlist);
    }
}
