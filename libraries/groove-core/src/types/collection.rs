use super::{PathKey, Track};
use serde::{Deserialize, Serialize};

/// Shape of a collection node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Node whose children are further groups (artists, albums, ...)
    Group,

    /// Node whose children are tracks, addressed by index
    Tracks,
}

/// Cached content of one collection node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CollectionEntry {
    /// Child groups in display order
    Group { children: Vec<PathKey> },

    /// Tracks in display order; track `i` lives at `path ++ [#i]`
    Tracks { tracks: Vec<Track> },
}

impl CollectionEntry {
    /// Node kind of this entry
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Group { .. } => NodeKind::Group,
            Self::Tracks { .. } => NodeKind::Tracks,
        }
    }

    /// Child keys in display order
    ///
    /// Track lists expose their tracks as index keys `#0..#n`.
    pub fn child_keys(&self) -> Vec<PathKey> {
        match self {
            Self::Group { children } => children.clone(),
            Self::Tracks { tracks } => (0..tracks.len() as u64).map(PathKey::Index).collect(),
        }
    }
}
