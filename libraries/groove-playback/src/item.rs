//! Queue items
//!
//! A queue item is one collection subtree enqueued into the playlist. When
//! the item is built, the subtree is flattened depth-first into an ordered
//! list of track positions, and its shape is snapshotted so later removals
//! can collapse emptied groups without consulting the collection again.
//!
//! ```text
//! root: /Artist
//! data:
//!   []             Group  [Album A, Album B]
//!   [Album A]      Tracks [#0, #1]
//!   [Album B]      Tracks [#0]
//! track_positions:
//!   [Album A, #0]  [Album A, #1]  [Album B, #0]
//! ```

use crate::error::{PlaybackError, Result};
use groove_core::{CollectionLookup, CollectionPath, NodeKind, PathKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot of one node of the enqueued subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShape {
    /// Path relative to the item root
    pub path: CollectionPath,
    pub kind: NodeKind,
    pub child_keys: Vec<PathKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemovalAction {
    Remove,
}

/// Record of a removal applied to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Removal {
    pub action: RemovalAction,
    /// Absolute collection path that was removed
    pub path: CollectionPath,
}

/// One enqueued collection subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    root: CollectionPath,
    track_positions: Vec<CollectionPath>,
    data: Vec<NodeShape>,
    #[serde(default)]
    removals: Vec<Removal>,
}

impl QueueItem {
    /// Build an item by flattening the subtree at `root`
    ///
    /// `root` may point at a group, a track list, or a single track. Nodes
    /// missing from the collection cache are skipped.
    ///
    /// # Errors
    /// `EmptySelection` if no track under `root` could be resolved.
    pub fn build(
        root: CollectionPath,
        collection: &(impl CollectionLookup + ?Sized),
    ) -> Result<Self> {
        let mut item = Self {
            root,
            track_positions: Vec::new(),
            data: Vec::new(),
            removals: Vec::new(),
        };
        item.expand(CollectionPath::root(), collection);

        if item.track_positions.is_empty() {
            return Err(PlaybackError::EmptySelection(item.root.key()));
        }

        debug!(root = %item.root, tracks = item.track_positions.len(), "Built queue item");
        Ok(item)
    }

    fn expand(&mut self, relative: CollectionPath, collection: &(impl CollectionLookup + ?Sized)) {
        let absolute = self.root.join(&relative);

        match collection.entry(&absolute) {
            Some(entry) => {
                let child_keys = entry.child_keys();
                self.data.push(NodeShape {
                    path: relative.clone(),
                    kind: entry.kind(),
                    child_keys: child_keys.clone(),
                });

                match entry.kind() {
                    NodeKind::Tracks => self
                        .track_positions
                        .extend(child_keys.into_iter().map(|key| relative.child(key))),
                    NodeKind::Group => {
                        for key in child_keys {
                            self.expand(relative.child(key), collection);
                        }
                    }
                }
            }
            None if collection.resolve_track(&absolute).is_some() => {
                self.track_positions.push(relative);
            }
            None => debug!(path = %absolute, "Skipping uncached collection node"),
        }
    }

    pub fn root(&self) -> &CollectionPath {
        &self.root
    }

    /// Root-relative track paths in play order
    pub fn track_positions(&self) -> &[CollectionPath] {
        &self.track_positions
    }

    /// Subtree shape snapshot
    pub fn data(&self) -> &[NodeShape] {
        &self.data
    }

    pub fn removals(&self) -> &[Removal] {
        &self.removals
    }

    /// Number of tracks left in the item
    pub fn len(&self) -> usize {
        self.track_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_positions.is_empty()
    }

    /// Absolute path of the track at `index`
    pub fn track_path(&self, index: usize) -> Option<CollectionPath> {
        self.track_positions
            .get(index)
            .map(|relative| self.root.join(relative))
    }

    /// Index of the track with absolute path `path`
    pub fn position_of(&self, path: &CollectionPath) -> Option<usize> {
        let relative = path.strip_prefix(&self.root)?;
        self.track_positions.iter().position(|p| *p == relative)
    }

    /// Shape of the node at root-relative `path`
    pub fn shape(&self, path: &CollectionPath) -> Option<&NodeShape> {
        self.data.iter().find(|shape| shape.path == *path)
    }

    /// Remove everything under root-relative `relative` and collapse parents
    /// left without children. The item root itself is never collapsed.
    ///
    /// Returns false, leaving the item untouched, when nothing lies under
    /// `relative`.
    pub(crate) fn remove_subtree(&mut self, relative: &CollectionPath) -> bool {
        let matched = self.track_positions.iter().any(|p| relative.is_prefix_of(p))
            || self.data.iter().any(|shape| relative.is_prefix_of(&shape.path));
        if !matched {
            return false;
        }

        self.track_positions.retain(|p| !relative.is_prefix_of(p));
        self.data.retain(|shape| !relative.is_prefix_of(&shape.path));
        self.removals.push(Removal {
            action: RemovalAction::Remove,
            path: self.root.join(relative),
        });

        let mut child = relative.clone();
        while let Some((parent, key)) = child.split_last() {
            let key = key.clone();
            let Some(index) = self.data.iter().position(|shape| shape.path == parent) else {
                break;
            };

            let shape = &mut self.data[index];
            shape.child_keys.retain(|k| *k != key);
            if !shape.child_keys.is_empty() || parent.is_empty() {
                break;
            }

            debug!(root = %self.root, group = %parent, "Collapsing emptied group");
            self.data.remove(index);
            child = parent;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_core::{MemoryCollection, Track};

    fn path(s: &str) -> CollectionPath {
        s.parse().unwrap()
    }

    fn tracks(prefix: &str, n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::new(format!("{prefix}-{i}"), format!("Track {i}"), "Artist"))
            .collect()
    }

    fn collection() -> MemoryCollection {
        let mut c = MemoryCollection::new();
        c.insert_group(path("/Artist"), vec![PathKey::name("A"), PathKey::name("B")]);
        c.insert_tracks(path("/Artist/A"), tracks("a", 2));
        c.insert_tracks(path("/Artist/B"), tracks("b", 1));
        c
    }

    #[test]
    fn flattens_depth_first() {
        let item = QueueItem::build(path("/Artist"), &collection()).unwrap();

        assert_eq!(
            item.track_positions(),
            &[path("/A/#0"), path("/A/#1"), path("/B/#0")]
        );
        assert_eq!(item.data().len(), 3);
        assert_eq!(item.shape(&CollectionPath::root()).unwrap().kind, NodeKind::Group);
        assert_eq!(item.track_path(2), Some(path("/Artist/B/#0")));
    }

    #[test]
    fn single_track_root() {
        let item = QueueItem::build(path("/Artist/A/#1"), &collection()).unwrap();

        assert_eq!(item.track_positions(), &[CollectionPath::root()]);
        assert!(item.data().is_empty());
        assert_eq!(item.track_path(0), Some(path("/Artist/A/#1")));
        assert_eq!(item.position_of(&path("/Artist/A/#1")), Some(0));
    }

    #[test]
    fn uncached_subtree_is_an_empty_selection() {
        let result = QueueItem::build(path("/Nobody"), &collection());
        assert!(matches!(result, Err(PlaybackError::EmptySelection(_))));
    }

    #[test]
    fn uncached_children_are_skipped() {
        let mut c = collection();
        c.remove(&path("/Artist/B"));

        let item = QueueItem::build(path("/Artist"), &c).unwrap();
        assert_eq!(item.len(), 2);
    }

    #[test]
    fn removing_last_track_of_group_collapses_it() {
        let mut item = QueueItem::build(path("/Artist"), &collection()).unwrap();

        item.remove_subtree(&path("/B/#0"));

        assert_eq!(item.len(), 2);
        assert!(item.shape(&path("/B")).is_none());
        let root = item.shape(&CollectionPath::root()).unwrap();
        assert_eq!(root.child_keys, vec![PathKey::name("A")]);
        assert_eq!(item.removals()[0].path, path("/Artist/B/#0"));
    }

    #[test]
    fn removing_one_track_keeps_group() {
        let mut item = QueueItem::build(path("/Artist"), &collection()).unwrap();

        item.remove_subtree(&path("/A/#0"));

        assert_eq!(item.track_positions(), &[path("/A/#1"), path("/B/#0")]);
        assert_eq!(item.shape(&path("/A")).unwrap().child_keys, vec![PathKey::Index(1)]);
    }

    #[test]
    fn root_shape_survives_emptying() {
        let mut item = QueueItem::build(path("/Artist/B"), &collection()).unwrap();

        item.remove_subtree(&path("/#0"));

        assert!(item.is_empty());
        assert!(item.shape(&CollectionPath::root()).unwrap().child_keys.is_empty());
    }
}
