//! Core traits for Groove
//!
//! These traits define the boundary between the playback core and the
//! collection cache that feeds it.

use crate::types::{CollectionEntry, CollectionPath, PathKey, Track};

/// Read-only view of the cached music collection
///
/// `entry` returns `None` for nodes that have not been fetched from the
/// server yet; callers treat that as "not yet known" rather than as an error.
pub trait CollectionLookup {
    /// Cached content of the node at `path`
    fn entry(&self, path: &CollectionPath) -> Option<&CollectionEntry>;

    /// Resolve a track path (`tracks_node ++ [#index]`) to its metadata
    fn resolve_track(&self, path: &CollectionPath) -> Option<&Track> {
        let (parent, last) = path.split_last()?;
        let PathKey::Index(index) = last else {
            return None;
        };

        match self.entry(&parent)? {
            CollectionEntry::Tracks { tracks } => tracks.get(usize::try_from(*index).ok()?),
            CollectionEntry::Group { .. } => None,
        }
    }
}
