//! Playing status
//!
//! Transient telemetry reported by the platform media element for the
//! now-playing track. Reset whenever the track identity changes.

use crate::types::MediaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingStatus {
    /// Elapsed seconds
    current_time: f64,
    /// Track length in seconds
    duration: f64,
    /// Seconds buffered ahead of the start
    buffered: f64,
    error: Option<MediaError>,
    /// Track the telemetry belongs to
    #[serde(skip)]
    track_id: Option<String>,
}

/// Non-finite and negative telemetry is reported as zero
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl PlayingStatus {
    /// Status for `track_id`, resuming at `current_time`
    pub fn resumed(track_id: Option<String>, current_time: f64) -> Self {
        Self {
            current_time: sanitize(current_time),
            track_id,
            ..Self::default()
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn buffered(&self) -> f64 {
        self.buffered
    }

    pub fn error(&self) -> Option<&MediaError> {
        self.error.as_ref()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    pub fn set_current_time(&mut self, seconds: f64) {
        self.current_time = sanitize(seconds);
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = sanitize(seconds);
    }

    pub fn set_buffered(&mut self, seconds: f64) {
        self.buffered = sanitize(seconds);
    }

    pub fn set_error(&mut self, error: MediaError) {
        self.error = Some(error);
    }

    /// Follow `track_id`; telemetry is zeroed if it belongs to another track
    ///
    /// Returns true if a reset happened.
    pub fn follow(&mut self, track_id: Option<&str>) -> bool {
        if self.track_id.as_deref() == track_id {
            return false;
        }
        *self = Self {
            track_id: track_id.map(str::to_string),
            ..Self::default()
        };
        true
    }
}
