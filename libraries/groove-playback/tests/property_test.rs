//! Property-based tests for playlist and player state
//!
//! Random operation sequences against a generated collection; every property
//! checks an invariant that must hold after each step.

use groove_core::{CollectionPath, MemoryCollection, PathKey, Track};
use groove_playback::{
    Action, Cursor, MemoryStorage, NullSink, Player, PlayerConfig, Playlist, RemovalPolicy,
};
use proptest::prelude::*;

// ===== Helpers =====

/// `/G<g>/A<a>` albums with the given track counts
fn build_collection(albums: &[Vec<usize>]) -> (MemoryCollection, Vec<CollectionPath>) {
    let mut collection = MemoryCollection::new();
    let mut roots = Vec::new();

    for (g, group) in albums.iter().enumerate() {
        let group_path = CollectionPath::root().child(PathKey::name(format!("G{g}")));
        let mut children = Vec::new();
        for (a, &count) in group.iter().enumerate() {
            let key = PathKey::name(format!("A{a}"));
            let album = group_path.child(key.clone());
            let tracks = (0..count)
                .map(|t| Track::new(format!("{g}-{a}-{t}"), format!("Track {t}"), "Artist"))
                .collect();
            collection.insert_tracks(album.clone(), tracks);
            children.push(key);
            roots.push(album);
        }
        collection.insert_group(group_path.clone(), children);
        roots.push(group_path);
    }

    (collection, roots)
}

fn arbitrary_collection() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(1usize..4, 1..4), 1..4)
}

#[derive(Debug, Clone)]
enum Op {
    Append(usize),
    PlayNow(usize),
    Next,
    Prev,
    SetCurrent(usize, usize),
    Remove(usize, usize),
    Clear,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::Append),
        2 => any::<usize>().prop_map(Op::PlayNow),
        3 => Just(Op::Next),
        2 => Just(Op::Prev),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(i, t)| Op::SetCurrent(i, t)),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(i, t)| Op::Remove(i, t)),
        1 => Just(Op::Clear),
    ]
}

/// Pick a removal target: the item root, a group below it, or a single track
fn removal_target(playlist: &Playlist, item_index: usize, pick: usize) -> CollectionPath {
    let item = &playlist.items()[item_index];
    let track = item.track_path(pick % item.len()).unwrap();
    match pick % 3 {
        0 => item.root().clone(),
        1 => track.parent().unwrap_or(track),
        _ => track,
    }
}

fn apply(
    playlist: &mut Playlist,
    op: &Op,
    collection: &MemoryCollection,
    roots: &[CollectionPath],
    policy: RemovalPolicy,
) {
    match op {
        Op::Append(r) => playlist.append(roots[r % roots.len()].clone(), collection).unwrap(),
        Op::PlayNow(r) => playlist
            .play_now(roots[r % roots.len()].clone(), collection)
            .unwrap(),
        Op::Next => playlist.next(),
        Op::Prev => playlist.prev(),
        Op::SetCurrent(i, t) if !playlist.is_empty() => {
            let item_index = i % playlist.len();
            let item = &playlist.items()[item_index];
            let path = item.track_path(t % item.len()).unwrap();
            playlist.set_current(item_index, &path).unwrap();
        }
        Op::Remove(i, pick) if !playlist.is_empty() => {
            let item_index = i % playlist.len();
            let target = removal_target(playlist, item_index, *pick);
            let target = if target.len() < playlist.items()[item_index].root().len() {
                playlist.items()[item_index].root().clone()
            } else {
                target
            };
            playlist.remove(item_index, &target, policy).unwrap();
        }
        Op::Clear => playlist.clear(),
        _ => {}
    }
}

fn assert_invariants(playlist: &Playlist) -> Result<(), TestCaseError> {
    for item in playlist.items() {
        prop_assert!(!item.is_empty(), "empty item left in playlist");
    }
    if let Some(current) = playlist.current() {
        let item = playlist.item(current.item_index);
        prop_assert!(item.is_some(), "current item out of range");
        prop_assert_eq!(
            item.and_then(|item| item.track_path(current.track_index)),
            Some(current.path.clone())
        );
    }
    if playlist.is_empty() {
        prop_assert!(playlist.current().is_none());
        prop_assert!(!playlist.can_next());
        prop_assert!(!playlist.can_prev());
    }
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: the current position is always absent or consistent
    #[test]
    fn current_position_stays_consistent(
        albums in arbitrary_collection(),
        ops in prop::collection::vec(arbitrary_op(), 1..40),
        affected in any::<bool>(),
    ) {
        let (collection, roots) = build_collection(&albums);
        let policy = if affected {
            RemovalPolicy::InvalidateAffected
        } else {
            RemovalPolicy::InvalidateAlways
        };
        let mut playlist = Playlist::new();

        for op in &ops {
            apply(&mut playlist, op, &collection, &roots, policy);
            assert_invariants(&playlist)?;

            let cursor = Cursor::from_playlist(&playlist);
            prop_assert_eq!(
                cursor.current().map(|p| &p.path),
                playlist.current().map(|c| &c.path)
            );
        }
    }

    /// Property: the playlist survives a JSON round trip unchanged
    #[test]
    fn playlist_serialization_round_trip(
        albums in arbitrary_collection(),
        ops in prop::collection::vec(arbitrary_op(), 1..30),
    ) {
        let (collection, roots) = build_collection(&albums);
        let mut playlist = Playlist::new();
        for op in &ops {
            apply(&mut playlist, op, &collection, &roots, RemovalPolicy::InvalidateAffected);
        }

        let json = serde_json::to_string(&playlist).unwrap();
        let mut restored: Playlist = serde_json::from_str(&json).unwrap();

        prop_assert!(!restored.validate());
        prop_assert_eq!(restored, playlist);
    }

    /// Property: next visits every track exactly once, in order
    #[test]
    fn next_visits_every_track(albums in arbitrary_collection()) {
        let (collection, roots) = build_collection(&albums);
        let mut playlist = Playlist::new();
        for root in &roots {
            playlist.append(root.clone(), &collection).unwrap();
        }

        let mut visited = 0;
        playlist.next();
        while let Some(current) = playlist.current() {
            prop_assert_eq!(playlist.ordinal_of(current), visited);
            visited += 1;
            playlist.next();
        }
        prop_assert_eq!(visited, playlist.track_count());
    }

    /// Property: status always belongs to the now-playing track
    #[test]
    fn status_follows_now_playing(
        albums in arbitrary_collection(),
        steps in prop::collection::vec((0u8..4, 0.0f64..500.0), 1..30),
    ) {
        let (collection, roots) = build_collection(&albums);
        let first = roots[0].clone();
        let mut player = Player::new(
            collection,
            Box::new(MemoryStorage::new()),
            Box::new(NullSink),
            PlayerConfig::default(),
        )
        .unwrap();
        player.dispatch_view(Action::PlaylistPlayNow { path: first });

        for (step, seconds) in steps {
            let before = player.now_playing().track_id().map(str::to_string);
            let action = match step {
                0 => Action::PlaylistNext,
                1 => Action::PlaylistPrev,
                2 => Action::TimeUpdate { current_time: seconds },
                _ => Action::PlaylistPlayNow { path: roots[roots.len() - 1].clone() },
            };
            player.dispatch_view(action);

            let after = player.now_playing().track_id();
            prop_assert_eq!(player.status().track_id(), after);
            if before.as_deref() != after {
                prop_assert_eq!(player.status().current_time(), 0.0);
            }
            prop_assert!(player.status().current_time() >= 0.0);
        }
    }
}
