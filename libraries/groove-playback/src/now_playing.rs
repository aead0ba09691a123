//! Now-playing state
//!
//! The track is derived: it is whatever the active navigation source
//! resolves to through the collection cache, denormalized here for
//! rendering. Playback flags are plain persisted values.

use crate::types::TrackSource;
use crate::volume::Volume;
use groove_core::{CollectionPath, Track};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    track: Option<Track>,
    source: Option<TrackSource>,
    /// Path of a track picked straight from the collection
    collection_path: Option<CollectionPath>,
    playing: bool,
    repeat: bool,
    volume: Volume,
}

impl NowPlaying {
    /// Restore persisted flags; the track is resolved afterwards
    pub fn restored(
        source: Option<TrackSource>,
        playing: bool,
        repeat: bool,
        volume: Volume,
    ) -> Self {
        Self {
            track: None,
            source,
            collection_path: None,
            playing,
            repeat,
            volume,
        }
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|track| track.id.as_str())
    }

    pub fn source(&self) -> Option<TrackSource> {
        self.source
    }

    pub fn collection_path(&self) -> Option<&CollectionPath> {
        self.collection_path.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub(crate) fn volume_mut(&mut self) -> &mut Volume {
        &mut self.volume
    }

    pub(crate) fn set_source(&mut self, source: TrackSource) {
        self.source = Some(source);
        if source != TrackSource::Collection {
            self.collection_path = None;
        }
    }

    pub(crate) fn select_from_collection(&mut self, path: CollectionPath) {
        self.source = Some(TrackSource::Collection);
        self.collection_path = Some(path);
    }

    /// Returns true if the flag changed
    pub(crate) fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.playing != playing;
        self.playing = playing;
        changed
    }

    pub(crate) fn set_repeat(&mut self, repeat: bool) -> bool {
        let changed = self.repeat != repeat;
        self.repeat = repeat;
        changed
    }

    /// Store a freshly resolved track
    ///
    /// Returns the previous track id when the identity changed.
    pub(crate) fn replace_track(&mut self, track: Option<Track>) -> Option<Option<String>> {
        let new_id = track.as_ref().map(|t| t.id.as_str());
        if new_id == self.track_id() {
            // same identity, metadata may still have been refreshed
            self.track = track;
            return None;
        }

        let previous = self.track.take().map(|t| t.id);
        self.track = track;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_track_reports_identity_changes() {
        let mut now_playing = NowPlaying::default();

        assert_eq!(
            now_playing.replace_track(Some(Track::new("a", "A", "X"))),
            Some(None)
        );
        assert_eq!(
            now_playing.replace_track(Some(Track::new("a", "A (remaster)", "X"))),
            None
        );
        assert_eq!(now_playing.track().unwrap().title, "A (remaster)");
        assert_eq!(
            now_playing.replace_track(None),
            Some(Some("a".to_string()))
        );
        assert!(now_playing.track().is_none());
    }

    #[test]
    fn switching_source_forgets_collection_pick() {
        let mut now_playing = NowPlaying::default();
        now_playing.select_from_collection("/a/#0".parse().unwrap());
        assert!(now_playing.collection_path().is_some());

        now_playing.set_source(TrackSource::Playlist);
        assert_eq!(now_playing.source(), Some(TrackSource::Playlist));
        assert!(now_playing.collection_path().is_none());
    }

    #[test]
    fn flags_report_changes() {
        let mut now_playing = NowPlaying::default();
        assert!(now_playing.set_playing(true));
        assert!(!now_playing.set_playing(true));
        assert!(now_playing.set_repeat(true));
        assert!(now_playing.repeat());
        assert_eq!(now_playing.volume().level(), 0.75);
    }
}
