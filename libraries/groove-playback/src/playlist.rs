//! Playlist state
//!
//! Ordered queue items plus at most one current position. The current
//! position is either absent or a consistent `(item, track, path)` triple;
//! every operation either recomputes the whole triple or clears it.
//!
//! ```text
//!            append / remove(other) / prev at start
//!             ┌────┐
//!             ▼    │        play_now, set_current, next (non-empty)
//!          ┌───────┴┐ ───────────────────────────────▶ ┌────────────┐
//!          │ Empty  │                                  │ Positioned │◀─┐ next / prev /
//!          └────────┘ ◀─────────────────────────────── └────────────┘──┘ set_current
//!                      next past the end, remove
//! ```

use crate::error::{PlaybackError, Result};
use crate::item::QueueItem;
use crate::types::RemovalPolicy;
use groove_core::{CollectionLookup, CollectionPath, Track};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The playing position inside the playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPosition {
    pub item_index: usize,
    pub track_index: usize,
    /// Always `items[item_index].root ++ track_positions[track_index]`
    pub path: CollectionPath,
}

/// Queue of enqueued subtrees with a single current position
///
/// Decoding repairs the playlist (see [`Playlist::validate`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaylistRecord")]
pub struct Playlist {
    items: Vec<QueueItem>,
    current: Option<CurrentPosition>,
}

#[derive(Deserialize)]
struct PlaylistRecord {
    items: Vec<QueueItem>,
    current: Option<CurrentPosition>,
}

impl From<PlaylistRecord> for Playlist {
    fn from(record: PlaylistRecord) -> Self {
        let mut playlist = Self {
            items: record.items,
            current: record.current,
        };
        if playlist.validate() {
            warn!(items = playlist.items.len(), "Decoded playlist needed repair");
        }
        playlist
    }
}

impl Playlist {
    /// Create empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    pub fn current(&self) -> Option<&CurrentPosition> {
        self.current.as_ref()
    }

    /// Number of queue items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of tracks across all items
    pub fn track_count(&self) -> usize {
        self.items.iter().map(QueueItem::len).sum()
    }

    fn position(&self, item_index: usize, track_index: usize) -> Option<CurrentPosition> {
        let path = self.items.get(item_index)?.track_path(track_index)?;
        Some(CurrentPosition {
            item_index,
            track_index,
            path,
        })
    }

    /// Enqueue the subtree at `root` after existing items
    ///
    /// The current position is untouched.
    pub fn append(
        &mut self,
        root: CollectionPath,
        collection: &(impl CollectionLookup + ?Sized),
    ) -> Result<()> {
        let item = QueueItem::build(root, collection)?;
        self.items.push(item);
        Ok(())
    }

    /// Enqueue the subtree at `root` in front and start playing its first track
    pub fn play_now(
        &mut self,
        root: CollectionPath,
        collection: &(impl CollectionLookup + ?Sized),
    ) -> Result<()> {
        let item = QueueItem::build(root, collection)?;
        self.items.insert(0, item);
        self.current = self.position(0, 0);
        Ok(())
    }

    /// Remove `path` from the item at `item_index`
    ///
    /// - `path` equal to the item root removes the whole item; positions in
    ///   later items are shifted so they keep pointing at the same track.
    /// - Otherwise every track under `path` is removed, emptied groups are
    ///   collapsed, and an item left without tracks is removed.
    ///   The current position is then cleared or re-derived per `policy`.
    ///
    /// A `path` matching nothing in the item is an error and changes nothing.
    pub fn remove(
        &mut self,
        item_index: usize,
        path: &CollectionPath,
        policy: RemovalPolicy,
    ) -> Result<()> {
        let item = self
            .items
            .get_mut(item_index)
            .ok_or(PlaybackError::IndexOutOfBounds(item_index))?;

        if path == item.root() {
            self.remove_item(item_index);
            return Ok(());
        }

        let relative =
            path.strip_prefix(item.root())
                .ok_or_else(|| PlaybackError::PathOutsideItem {
                    item_index,
                    path: path.key(),
                })?;
        if !item.remove_subtree(&relative) {
            return Err(PlaybackError::TrackNotFound(path.key()));
        }

        if item.is_empty() {
            debug!(item_index, "Queue item emptied, removing it");
            self.remove_item(item_index);
            if policy == RemovalPolicy::InvalidateAlways {
                self.current = None;
            }
            return Ok(());
        }

        self.current = match (policy, self.current.take()) {
            (RemovalPolicy::InvalidateAffected, Some(current)) => {
                if current.item_index != item_index {
                    Some(current)
                } else if path.is_prefix_of(&current.path) {
                    None
                } else {
                    self.items[item_index]
                        .position_of(&current.path)
                        .map(|track_index| CurrentPosition {
                            track_index,
                            ..current
                        })
                }
            }
            _ => None,
        };

        Ok(())
    }

    fn remove_item(&mut self, item_index: usize) {
        self.items.remove(item_index);
        self.current = match self.current.take() {
            Some(current) if current.item_index > item_index => Some(CurrentPosition {
                item_index: current.item_index - 1,
                ..current
            }),
            Some(current) if current.item_index == item_index => None,
            other => other,
        };
    }

    /// Point the current position at `path` inside the item at `item_index`
    ///
    /// Leaves the current position unchanged on failure.
    pub fn set_current(&mut self, item_index: usize, path: &CollectionPath) -> Result<()> {
        let item = self
            .items
            .get(item_index)
            .ok_or(PlaybackError::IndexOutOfBounds(item_index))?;
        let track_index = item
            .position_of(path)
            .ok_or_else(|| PlaybackError::TrackNotFound(path.key()))?;

        self.current = Some(CurrentPosition {
            item_index,
            track_index,
            path: path.clone(),
        });
        Ok(())
    }

    /// Advance to the next track
    ///
    /// From no position this starts at the first track; past the last track
    /// of the last item the position is cleared.
    pub fn next(&mut self) {
        let next = match &self.current {
            None => self.position(0, 0),
            Some(current) => self
                .position(current.item_index, current.track_index + 1)
                .or_else(|| self.position(current.item_index + 1, 0)),
        };
        self.current = next;
    }

    /// Step back one track; stays put at the very first track
    pub fn prev(&mut self) {
        let Some(current) = &self.current else {
            return;
        };

        let prev = if current.track_index > 0 {
            self.position(current.item_index, current.track_index - 1)
        } else if current.item_index > 0 {
            let item_index = current.item_index - 1;
            let last = self
                .items
                .get(item_index)
                .map_or(0, |item| item.len().saturating_sub(1));
            self.position(item_index, last)
        } else {
            None
        };

        if let Some(prev) = prev {
            self.current = Some(prev);
        }
    }

    pub fn can_next(&self) -> bool {
        self.current.as_ref().is_some_and(|current| {
            self.items
                .get(current.item_index)
                .is_some_and(|item| current.track_index + 1 < item.len())
                || current.item_index + 1 < self.items.len()
        })
    }

    pub fn can_prev(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.track_index > 0 || current.item_index > 0)
    }

    /// Resolve the current position to track metadata
    pub fn current_track(&self, collection: &(impl CollectionLookup + ?Sized)) -> Option<Track> {
        let current = self.current.as_ref()?;
        let track = collection.resolve_track(&current.path).cloned();
        if track.is_none() {
            debug!(path = %current.path, "Current track not in collection cache");
        }
        track
    }

    /// Drop every item and the current position
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    /// Replace the whole playlist (authoritative server snapshot)
    pub fn replace(&mut self, snapshot: Playlist) {
        *self = snapshot;
        self.validate();
    }

    /// Repair a deserialized playlist
    ///
    /// Drops items without tracks and a current position that does not match
    /// its item. Returns true if anything was repaired.
    pub fn validate(&mut self) -> bool {
        let mut repaired = false;

        while let Some(index) = self.items.iter().position(QueueItem::is_empty) {
            warn!(item_index = index, "Dropping queue item without tracks");
            self.remove_item(index);
            repaired = true;
        }

        if let Some(current) = &self.current {
            let consistent = self
                .position(current.item_index, current.track_index)
                .is_some_and(|expected| expected == *current);
            if !consistent {
                warn!(path = %current.path, "Dropping inconsistent current position");
                self.current = None;
                repaired = true;
            }
        }

        repaired
    }

    /// Flat track number of a position, counting across items
    pub fn ordinal_of(&self, position: &CurrentPosition) -> usize {
        self.items[..position.item_index.min(self.items.len())]
            .iter()
            .map(QueueItem::len)
            .sum::<usize>()
            + position.track_index
    }

    /// Position of the flat track number `ordinal`
    pub fn position_at(&self, ordinal: usize) -> Option<CurrentPosition> {
        let mut remaining = ordinal;
        for (item_index, item) in self.items.iter().enumerate() {
            if remaining < item.len() {
                return self.position(item_index, remaining);
            }
            remaining -= item.len();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_core::{MemoryCollection, PathKey};

    fn path(s: &str) -> CollectionPath {
        s.parse().unwrap()
    }

    fn collection() -> MemoryCollection {
        let mut c = MemoryCollection::new();
        c.insert_group(path("/X"), vec![PathKey::name("A"), PathKey::name("B")]);
        c.insert_tracks(
            path("/X/A"),
            vec![Track::new("a0", "A0", "X"), Track::new("a1", "A1", "X")],
        );
        c.insert_tracks(path("/X/B"), vec![Track::new("b0", "B0", "X")]);
        c.insert_tracks(path("/Y"), vec![Track::new("y0", "Y0", "Y")]);
        c
    }

    #[test]
    fn empty_playlist_predicates() {
        let mut playlist = Playlist::new();
        assert!(!playlist.can_next());
        assert!(!playlist.can_prev());

        playlist.next();
        assert!(playlist.current().is_none());
        playlist.prev();
        assert!(playlist.current().is_none());
    }

    #[test]
    fn append_does_not_position() {
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &collection()).unwrap();

        assert_eq!(playlist.len(), 1);
        assert!(playlist.current().is_none());
    }

    #[test]
    fn next_walks_items_then_ends() {
        let c = collection();
        let mut playlist = Playlist::new();
        playlist.append(path("/X/B"), &c).unwrap();
        playlist.append(path("/Y"), &c).unwrap();

        playlist.next();
        assert_eq!(playlist.current().unwrap().path, path("/X/B/#0"));
        assert!(playlist.can_next());

        playlist.next();
        let current = playlist.current().unwrap();
        assert_eq!((current.item_index, current.track_index), (1, 0));
        assert_eq!(current.path, path("/Y/#0"));
        assert!(!playlist.can_next());

        playlist.next();
        assert!(playlist.current().is_none());
    }

    #[test]
    fn prev_crosses_items_and_stops_at_start() {
        let c = collection();
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &c).unwrap();
        playlist.append(path("/Y"), &c).unwrap();
        playlist.set_current(1, &path("/Y/#0")).unwrap();

        playlist.prev();
        assert_eq!(playlist.current().unwrap().path, path("/X/B/#0"));
        assert_eq!(playlist.current().unwrap().track_index, 2);

        playlist.set_current(0, &path("/X/A/#0")).unwrap();
        assert!(!playlist.can_prev());
        playlist.prev();
        assert_eq!(playlist.current().unwrap().path, path("/X/A/#0"));
    }

    #[test]
    fn set_current_miss_leaves_position() {
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &collection()).unwrap();
        playlist.set_current(0, &path("/X/A/#1")).unwrap();

        let miss = playlist.set_current(0, &path("/X/A/#9"));
        assert!(matches!(miss, Err(PlaybackError::TrackNotFound(_))));
        let out_of_bounds = playlist.set_current(3, &path("/X/A/#0"));
        assert!(matches!(out_of_bounds, Err(PlaybackError::IndexOutOfBounds(3))));

        assert_eq!(playlist.current().unwrap().path, path("/X/A/#1"));
    }

    #[test]
    fn removing_whole_item_shifts_later_position() {
        let c = collection();
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &c).unwrap();
        playlist.append(path("/Y"), &c).unwrap();
        playlist.set_current(1, &path("/Y/#0")).unwrap();

        playlist
            .remove(0, &path("/X"), RemovalPolicy::InvalidateAlways)
            .unwrap();

        let current = playlist.current().unwrap();
        assert_eq!(current.item_index, 0);
        assert_eq!(current.path, path("/Y/#0"));
    }

    #[test]
    fn removing_playing_item_clears_position() {
        let mut playlist = Playlist::new();
        playlist.play_now(path("/Y"), &collection()).unwrap();

        playlist
            .remove(0, &path("/Y"), RemovalPolicy::InvalidateAlways)
            .unwrap();

        assert!(playlist.is_empty());
        assert!(playlist.current().is_none());
    }

    #[test]
    fn partial_removal_policies() {
        let c = collection();
        let mut legacy = Playlist::new();
        legacy.append(path("/X"), &c).unwrap();
        legacy.set_current(0, &path("/X/B/#0")).unwrap();
        let mut affected = legacy.clone();

        legacy
            .remove(0, &path("/X/A/#0"), RemovalPolicy::InvalidateAlways)
            .unwrap();
        assert!(legacy.current().is_none());

        affected
            .remove(0, &path("/X/A/#0"), RemovalPolicy::InvalidateAffected)
            .unwrap();
        let current = affected.current().unwrap();
        assert_eq!(current.track_index, 1);
        assert_eq!(current.path, path("/X/B/#0"));

        affected
            .remove(0, &path("/X/B"), RemovalPolicy::InvalidateAffected)
            .unwrap();
        assert!(affected.current().is_none());
    }

    #[test]
    fn remove_rejects_foreign_path() {
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &collection()).unwrap();

        let result = playlist.remove(0, &path("/Y/#0"), RemovalPolicy::InvalidateAlways);
        assert!(matches!(result, Err(PlaybackError::PathOutsideItem { .. })));
        assert!(matches!(
            playlist.remove(4, &path("/X"), RemovalPolicy::InvalidateAlways),
            Err(PlaybackError::IndexOutOfBounds(4))
        ));
    }

    #[test]
    fn ordinals_span_items() {
        let c = collection();
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &c).unwrap();
        playlist.append(path("/Y"), &c).unwrap();

        let last = playlist.position_at(3).unwrap();
        assert_eq!(last.path, path("/Y/#0"));
        assert_eq!(playlist.ordinal_of(&last), 3);
        assert!(playlist.position_at(4).is_none());
        assert_eq!(playlist.track_count(), 4);
    }

    #[test]
    fn validate_drops_inconsistent_position() {
        let c = collection();
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &c).unwrap();
        playlist.set_current(0, &path("/X/A/#1")).unwrap();

        let mut json = serde_json::to_value(&playlist).unwrap();
        json["current"]["path"] = serde_json::json!(["X", "B", 0]);
        let mut restored: Playlist = serde_json::from_value(json).unwrap();

        assert!(restored.current().is_none());
        assert_eq!(restored.len(), 1);
        assert!(!restored.validate());
    }

    #[test]
    fn decoding_drops_dangling_position() {
        let json = serde_json::json!({
            "items": [],
            "current": {"itemIndex": 2, "trackIndex": 0, "path": ["X", "A", 0]}
        });
        let playlist: Playlist = serde_json::from_value(json).unwrap();

        assert!(playlist.current().is_none());
        assert!(!playlist.can_next());
        assert!(!playlist.can_prev());
    }

    #[test]
    fn removing_unknown_path_changes_nothing() {
        let mut playlist = Playlist::new();
        playlist.play_now(path("/X"), &collection()).unwrap();
        let before = playlist.clone();

        for missing in ["/X/A/#9", "/X/C", "/X/B/#0/#1"] {
            let result = playlist.remove(0, &path(missing), RemovalPolicy::InvalidateAlways);
            assert!(matches!(result, Err(PlaybackError::TrackNotFound(_))), "{missing}");
        }

        assert_eq!(playlist, before);
        assert!(playlist.item(0).unwrap().removals().is_empty());
        assert_eq!(playlist.current().unwrap().path, path("/X/A/#0"));
    }

    #[test]
    fn removing_twice_reports_the_second_miss() {
        let mut playlist = Playlist::new();
        playlist.append(path("/X"), &collection()).unwrap();

        playlist
            .remove(0, &path("/X/A/#0"), RemovalPolicy::InvalidateAffected)
            .unwrap();
        let again = playlist.remove(0, &path("/X/A/#0"), RemovalPolicy::InvalidateAffected);

        assert!(matches!(again, Err(PlaybackError::TrackNotFound(_))));
        assert_eq!(playlist.item(0).unwrap().removals().len(), 1);
    }
}
