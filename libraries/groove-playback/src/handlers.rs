//! Store subscribers
//!
//! One function per store, registered with the dispatcher by
//! [`Player`](crate::Player). Each sees every payload, applies what concerns
//! its store and returns whether it accepted a mutation. Later subscribers
//! read the state earlier ones left behind:
//!
//! ```text
//! playlist ─▶ cursor ─▶ now_playing ─▶ status
//! ```

use crate::actions::{Action, Payload, PayloadSource};
use crate::cursor::Cursor;
use crate::events::PlayerEvent;
use crate::player::Stores;
use crate::types::TrackSource;
use groove_core::{CollectionLookup, Track};
use tracing::{debug, info, warn};

pub(crate) fn playlist<C: CollectionLookup>(stores: &mut Stores<C>, payload: &Payload) -> bool {
    let policy = stores.config.removal_policy;
    let playlist = &mut stores.playlist;
    let collection = &stores.collection;

    let result = match &payload.action {
        Action::PlaylistAppend { path } => playlist.append(path.clone(), collection),
        Action::PlaylistPlayNow { path } => playlist.play_now(path.clone(), collection),
        Action::PlaylistRemove { item_index, path } => playlist.remove(*item_index, path, policy),
        Action::PlaylistSetCurrent { item_index, path } => {
            playlist.set_current(*item_index, path)
        }
        Action::PlaylistNext => {
            playlist.next();
            Ok(())
        }
        Action::PlaylistPrev => {
            playlist.prev();
            Ok(())
        }
        Action::PlaylistClear => {
            playlist.clear();
            Ok(())
        }
        Action::PlaylistSnapshot { playlist: snapshot } => {
            playlist.replace(snapshot.clone());
            Ok(())
        }
        _ => return false,
    };

    match result {
        Ok(()) => {
            let length = stores.playlist.len();
            debug!(length, current = ?stores.playlist.current().map(|c| c.path.key()), "Playlist updated");
            stores.events.push(PlayerEvent::PlaylistChanged { length });
            true
        }
        Err(e) => {
            warn!(error = %e, action = ?payload.action, "Playlist action dropped");
            stores.events.push(PlayerEvent::NavigationFailed {
                message: e.to_string(),
            });
            stores.rejected = true;
            false
        }
    }
}

pub(crate) fn cursor<C: CollectionLookup>(stores: &mut Stores<C>, payload: &Payload) -> bool {
    let action = &payload.action;

    if action.is_playlist_action() {
        // the playlist drives the cursor unless the server does
        let drives = action.selects_playlist_position()
            || stores.now_playing.source() != Some(TrackSource::Cursor);
        if stores.rejected || !drives {
            return false;
        }
        let derived = Cursor::from_playlist(&stores.playlist);
        if derived == stores.cursor {
            return false;
        }
        stores.cursor = derived;
        stores.events.push(PlayerEvent::CursorChanged);
        return true;
    }

    match action {
        Action::CursorForward => stores.cursor.forward(),
        Action::CursorSet { index, path } => stores.cursor.set(*index, path.clone()),
        Action::CursorUpdate {
            previous,
            current,
            next,
        } => stores
            .cursor
            .apply(previous.clone(), current.clone(), next.clone()),
        _ => return false,
    }

    if action.moves_cursor() && payload.source == PayloadSource::ViewAction {
        stores.outgoing.push(action.clone());
    }
    stores.events.push(PlayerEvent::CursorChanged);
    true
}

fn set_playing<C>(stores: &mut Stores<C>, playing: bool) -> bool {
    if !stores.now_playing.set_playing(playing) {
        return false;
    }
    stores.events.push(PlayerEvent::StateChanged { playing });
    true
}

fn volume_changed<C>(stores: &mut Stores<C>) {
    let volume = stores.now_playing.volume();
    stores.events.push(PlayerEvent::VolumeChanged {
        volume: volume.level(),
        muted: volume.is_muted(),
    });
}

/// Track the active source currently points at
///
/// The second value says whether the source has a position at all, as
/// opposed to a position whose track is not cached yet.
fn resolve<C: CollectionLookup>(stores: &Stores<C>) -> (Option<Track>, bool) {
    let path = match stores.now_playing.source() {
        Some(TrackSource::Playlist) => stores.playlist.current().map(|c| &c.path),
        Some(TrackSource::Cursor) => stores.cursor.current().map(|p| &p.path),
        Some(TrackSource::Collection) => stores.now_playing.collection_path(),
        None => None,
    };

    match path {
        Some(path) => (stores.collection.resolve_track(path).cloned(), true),
        None => (None, false),
    }
}

/// Re-resolve the now-playing track; returns true if its identity changed
fn refresh_track<C: CollectionLookup>(stores: &mut Stores<C>, keep_known: bool) -> bool {
    let (track, positioned) = resolve(stores);
    if track.is_none() && keep_known {
        return false;
    }

    let Some(previous_track_id) = stores.now_playing.replace_track(track) else {
        return false;
    };
    let track_id = stores.now_playing.track_id().map(str::to_string);
    info!(track = ?track_id, previous = ?previous_track_id, "Now playing");
    stores.events.push(PlayerEvent::TrackChanged {
        track_id,
        previous_track_id,
    });

    if !positioned {
        set_playing(stores, false);
    }
    true
}

/// Derive the now-playing track of a restored session
///
/// Only the playlist position is persisted. Cursor slots and collection
/// picks come back empty, so for those sources `stored` stands in until the
/// server or the user repositions them. It is also the fallback when a
/// playlist position misses the cache. Without a track nothing can play.
pub(crate) fn restore_track<C: CollectionLookup>(
    stores: &mut Stores<C>,
    stored: Option<Track>,
) {
    let track = match stores.now_playing.source() {
        Some(TrackSource::Playlist) => match resolve(stores) {
            (Some(track), _) => Some(track),
            (None, true) => stored,
            (None, false) => None,
        },
        Some(TrackSource::Cursor | TrackSource::Collection) => stored,
        None => None,
    };

    if track.is_none() && stores.now_playing.set_playing(false) {
        debug!("Nothing to play after restore, pausing");
    }
    stores.now_playing.replace_track(track);
}

pub(crate) fn now_playing<C: CollectionLookup>(
    stores: &mut Stores<C>,
    payload: &Payload,
) -> bool {
    let action = &payload.action;

    if action.is_playlist_action() {
        if stores.rejected {
            return false;
        }
        let mut accepted = false;
        if action.selects_playlist_position()
            && stores.now_playing.source() != Some(TrackSource::Playlist)
        {
            stores.now_playing.set_source(TrackSource::Playlist);
            accepted = true;
        }
        if stores.now_playing.source() == Some(TrackSource::Playlist) {
            accepted |= refresh_track(stores, false);
        }
        return accepted;
    }

    match action {
        Action::CursorForward | Action::CursorSet { .. } | Action::CursorUpdate { .. } => {
            let mut accepted = false;
            if action.moves_cursor() && stores.now_playing.source() != Some(TrackSource::Cursor)
            {
                stores.now_playing.set_source(TrackSource::Cursor);
                accepted = true;
            }
            if stores.now_playing.source() == Some(TrackSource::Cursor) {
                accepted |= refresh_track(stores, false);
            }
            accepted
        }
        Action::SetCurrentTrack { path } => {
            stores.now_playing.select_from_collection(path.clone());
            refresh_track(stores, false);
            true
        }
        Action::CollectionLoaded { .. } => refresh_track(stores, true),

        Action::Play => set_playing(stores, true),
        Action::Pause => set_playing(stores, false),
        Action::TogglePlay => {
            let playing = !stores.now_playing.is_playing();
            set_playing(stores, playing)
        }
        Action::SetRepeat { repeat } => {
            if !stores.now_playing.set_repeat(*repeat) {
                return false;
            }
            stores
                .events
                .push(PlayerEvent::RepeatChanged { repeat: *repeat });
            true
        }
        Action::SetVolume { volume } => {
            if !stores.now_playing.volume_mut().set_level(*volume) {
                return false;
            }
            volume_changed(stores);
            true
        }
        Action::SetMuted { muted } => {
            if !stores.now_playing.volume_mut().set_muted(*muted) {
                return false;
            }
            volume_changed(stores);
            true
        }
        Action::ToggleMute => {
            stores.now_playing.volume_mut().toggle_mute();
            volume_changed(stores);
            true
        }

        Action::Ended { source, repeat } => {
            if *repeat || stores.now_playing.repeat() {
                stores
                    .events
                    .push(PlayerEvent::SeekRequested { position: 0.0 });
                set_playing(stores, true);
                return true;
            }
            if stores.now_playing.source() != Some(*source) {
                debug!(source = ?source, "Ended for inactive source, ignoring");
                return false;
            }
            let followup = match source {
                TrackSource::Playlist => Action::PlaylistNext,
                TrackSource::Cursor => Action::CursorForward,
                TrackSource::Collection => return set_playing(stores, false),
            };
            stores.followups.push_back(Payload {
                source: payload.source,
                action: followup,
            });
            false
        }
        _ => false,
    }
}

pub(crate) fn status<C: CollectionLookup>(stores: &mut Stores<C>, payload: &Payload) -> bool {
    let mut accepted = false;
    if stores.status.follow(stores.now_playing.track_id()) {
        debug!(track = ?stores.now_playing.track_id(), "Playing status reset");
        stores.events.push(PlayerEvent::StatusReset);
        accepted = true;
    }

    match &payload.action {
        Action::Seek { position } => {
            stores.status.set_current_time(*position);
            let position = stores.status.current_time();
            stores.events.push(PlayerEvent::SeekRequested { position });
            true
        }
        Action::Ended { repeat, .. } if *repeat || stores.now_playing.repeat() => {
            stores.status.set_current_time(0.0);
            true
        }
        Action::TimeUpdate { current_time } => {
            stores.status.set_current_time(*current_time);
            true
        }
        Action::DurationChange { duration } => {
            stores.status.set_duration(*duration);
            true
        }
        Action::Progress { buffered } => {
            stores.status.set_buffered(*buffered);
            true
        }
        Action::MediaError { error } => {
            warn!(code = ?error.code, message = %error.message, "Media element error");
            stores.status.set_error(error.clone());
            stores.events.push(PlayerEvent::Error {
                message: error.message.clone(),
            });
            true
        }
        _ => accepted,
    }
}
