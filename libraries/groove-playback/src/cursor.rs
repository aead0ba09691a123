//! Three-slot navigation cursor
//!
//! The cursor is the server-driven navigation model: the server computes
//! `previous`, `current` and `next` and pushes them on request. When the
//! playlist is the navigation authority the cursor is derived from it with
//! [`Cursor::from_playlist`], so both models always agree on what is current.

use crate::playlist::Playlist;
use groove_core::CollectionPath;
use serde::{Deserialize, Serialize};

/// One cursor slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Flat track number across the playlist
    pub index: usize,
    pub path: CollectionPath,
}

impl Position {
    pub fn new(index: usize, path: CollectionPath) -> Self {
        Self { index, path }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    previous: Option<Position>,
    current: Option<Position>,
    next: Option<Position>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Position> {
        self.previous.as_ref()
    }

    pub fn current(&self) -> Option<&Position> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Position> {
        self.next.as_ref()
    }

    /// Shift one slot forward; `next` stays empty until the server refills it
    pub fn forward(&mut self) {
        self.previous = self.current.take();
        self.current = self.next.take();
    }

    /// Jump to `path`, forgetting previous and next
    pub fn set(&mut self, index: usize, path: CollectionPath) {
        self.previous = None;
        self.current = Some(Position::new(index, path));
        self.next = None;
    }

    /// Replace all three slots (server push)
    pub fn apply(
        &mut self,
        previous: Option<Position>,
        current: Option<Position>,
        next: Option<Position>,
    ) {
        self.previous = previous;
        self.current = current;
        self.next = next;
    }

    /// Cursor view of the playlist's current position
    pub fn from_playlist(playlist: &Playlist) -> Self {
        let Some(current) = playlist.current() else {
            return Self::default();
        };

        let index = playlist.ordinal_of(current);
        let slot = |ordinal: usize| {
            playlist
                .position_at(ordinal)
                .map(|position| Position::new(ordinal, position.path))
        };

        Self {
            previous: index.checked_sub(1).and_then(slot),
            current: Some(Position::new(index, current.path.clone())),
            next: slot(index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_core::{MemoryCollection, Track};

    fn path(s: &str) -> CollectionPath {
        s.parse().unwrap()
    }

    #[test]
    fn forward_shifts_and_empties_next() {
        let mut cursor = Cursor::new();
        cursor.apply(
            Some(Position::new(0, path("/a/#0"))),
            Some(Position::new(1, path("/a/#1"))),
            Some(Position::new(2, path("/a/#2"))),
        );

        cursor.forward();

        assert_eq!(cursor.previous().unwrap().index, 1);
        assert_eq!(cursor.current().unwrap().path, path("/a/#2"));
        assert!(cursor.next().is_none());

        cursor.forward();
        assert!(cursor.current().is_none());
    }

    #[test]
    fn set_clears_history() {
        let mut cursor = Cursor::new();
        cursor.apply(
            Some(Position::new(0, path("/a/#0"))),
            Some(Position::new(1, path("/a/#1"))),
            None,
        );

        cursor.set(7, path("/b/#3"));

        assert!(cursor.previous().is_none());
        assert!(cursor.next().is_none());
        assert_eq!(cursor.current(), Some(&Position::new(7, path("/b/#3"))));
    }

    #[test]
    fn derived_from_playlist() {
        let mut collection = MemoryCollection::new();
        collection.insert_tracks(
            path("/a"),
            vec![Track::new("0", "0", "x"), Track::new("1", "1", "x")],
        );
        collection.insert_tracks(path("/b"), vec![Track::new("2", "2", "x")]);

        let mut playlist = Playlist::new();
        assert_eq!(Cursor::from_playlist(&playlist), Cursor::default());

        playlist.append(path("/a"), &collection).unwrap();
        playlist.append(path("/b"), &collection).unwrap();
        playlist.set_current(0, &path("/a/#1")).unwrap();

        let cursor = Cursor::from_playlist(&playlist);
        assert_eq!(cursor.previous(), Some(&Position::new(0, path("/a/#0"))));
        assert_eq!(cursor.current(), Some(&Position::new(1, path("/a/#1"))));
        assert_eq!(cursor.next(), Some(&Position::new(2, path("/b/#0"))));
    }
}
