//! In-memory collection cache

use crate::error::Result;
use crate::traits::CollectionLookup;
use crate::types::{CollectionEntry, CollectionPath, PathKey, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One cached node, as stored in collection dumps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub path: CollectionPath,
    #[serde(flatten)]
    pub entry: CollectionEntry,
}

/// Collection cache keyed by canonical path
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    entries: HashMap<String, CollectionEntry>,
}

impl MemoryCollection {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from a JSON array of [`CollectionRecord`]s
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CollectionRecord> = serde_json::from_str(json)?;
        let mut collection = Self::new();
        for record in records {
            collection.insert(record.path, record.entry);
        }
        debug!(entries = collection.len(), "Loaded collection dump");
        Ok(collection)
    }

    /// Cache (or replace) the node at `path`
    pub fn insert(&mut self, path: CollectionPath, entry: CollectionEntry) {
        self.entries.insert(path.key(), entry);
    }

    /// Cache a group node
    pub fn insert_group(&mut self, path: CollectionPath, children: Vec<PathKey>) {
        self.insert(path, CollectionEntry::Group { children });
    }

    /// Cache a track list node
    pub fn insert_tracks(&mut self, path: CollectionPath, tracks: Vec<Track>) {
        self.insert(path, CollectionEntry::Tracks { tracks });
    }

    /// Drop the node at `path`
    pub fn remove(&mut self, path: &CollectionPath) -> Option<CollectionEntry> {
        self.entries.remove(&path.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CollectionLookup for MemoryCollection {
    fn entry(&self, path: &CollectionPath) -> Option<&CollectionEntry> {
        self.entries.get(&path.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> CollectionPath {
        s.parse().unwrap()
    }

    fn sample() -> MemoryCollection {
        let mut collection = MemoryCollection::new();
        collection.insert_group(path("/Artist"), vec![PathKey::name("Album")]);
        collection.insert_tracks(
            path("/Artist/Album"),
            vec![Track::new("t1", "One", "Artist"), Track::new("t2", "Two", "Artist")],
        );
        collection
    }

    #[test]
    fn resolves_tracks_by_index() {
        let collection = sample();
        assert_eq!(
            collection.resolve_track(&path("/Artist/Album/#1")).map(|t| t.id.as_str()),
            Some("t2")
        );
    }

    #[test]
    fn unresolvable_paths() {
        let collection = sample();
        // past the end of the list
        assert!(collection.resolve_track(&path("/Artist/Album/#2")).is_none());
        // group child is not a track
        assert!(collection.resolve_track(&path("/Artist/Album")).is_none());
        // never fetched
        assert!(collection.resolve_track(&path("/Other/Album/#0")).is_none());
        assert!(collection.resolve_track(&CollectionPath::root()).is_none());
    }

    #[test]
    fn loads_json_dump() {
        let json = r#"[
            {"path": ["Artist"], "kind": "group", "children": ["Album"]},
            {"path": ["Artist", "Album"], "kind": "tracks",
             "tracks": [{"id": "t1", "title": "One", "artist": "Artist", "duration": 201.5}]}
        ]"#;
        let collection = MemoryCollection::from_json(json).unwrap();

        assert_eq!(collection.len(), 2);
        let track = collection.resolve_track(&path("/Artist/Album/#0")).unwrap();
        assert_eq!(track.duration, Some(201.5));
    }

    #[test]
    fn rejects_malformed_dump() {
        assert!(MemoryCollection::from_json(r#"[{"path": ["a"], "kind": "nope"}]"#).is_err());
    }
}
