//! Player session - owns the stores and drives the dispatcher
//!
//! Coordinates playlist, cursor, now-playing and playing-status stores,
//! persistence, and the outgoing server buffer.

use crate::{
    actions::{Action, Payload},
    controls::{BackAction, BackControl},
    cursor::Cursor,
    dispatcher::{DispatchReport, Dispatcher},
    error::Result,
    events::PlayerEvent,
    handlers,
    now_playing::NowPlaying,
    playlist::Playlist,
    status::PlayingStatus,
    storage::{KeyValueStorage, PersistedState, Repository},
    types::{PlayerConfig, TrackSource},
    volume::Volume,
    wire::{MessageSink, Outbox, WireMessage},
};
use groove_core::CollectionLookup;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Store state shared by the dispatcher subscribers
pub(crate) struct Stores<C> {
    pub(crate) collection: C,
    pub(crate) config: PlayerConfig,
    pub(crate) playlist: Playlist,
    pub(crate) cursor: Cursor,
    pub(crate) now_playing: NowPlaying,
    pub(crate) status: PlayingStatus,
    pub(crate) events: Vec<PlayerEvent>,
    /// Payloads to dispatch once the current one has reached every store
    pub(crate) followups: VecDeque<Payload>,
    /// Actions to mirror to the server
    pub(crate) outgoing: Vec<Action>,
    /// Set when the playlist refused the current payload
    pub(crate) rejected: bool,
}

fn build_dispatcher<C: CollectionLookup + 'static>() -> Result<Dispatcher<Stores<C>>> {
    let mut builder = Dispatcher::<Stores<C>>::builder();
    let playlist = builder.register("playlist", handlers::playlist::<C>);
    let cursor = builder.register("cursor", handlers::cursor::<C>);
    let now_playing = builder.register("now_playing", handlers::now_playing::<C>);
    let status = builder.register("status", handlers::status::<C>);

    builder.wait_for(cursor, &[playlist])?;
    builder.wait_for(now_playing, &[playlist, cursor])?;
    builder.wait_for(status, &[now_playing])?;
    builder.build()
}

/// Player session
///
/// Construct once and pass by reference; every state change goes through
/// [`Player::dispatch`].
pub struct Player<C: CollectionLookup + 'static> {
    stores: Stores<C>,
    dispatcher: Dispatcher<Stores<C>>,
    repository: Repository,
    outbox: Outbox,
    back: BackControl,
}

impl<C: CollectionLookup + 'static> Player<C> {
    /// Restore a session from `storage`
    pub fn new(
        collection: C,
        storage: Box<dyn KeyValueStorage>,
        sink: Box<dyn MessageSink>,
        config: PlayerConfig,
    ) -> Result<Self> {
        let back = BackControl::new(config.back_window());
        let repository = Repository::new(storage);
        let state = repository.load(PersistedState {
            volume: config.default_volume,
            ..PersistedState::default()
        });

        // the server pushes cursor slots again after reconnecting
        let cursor = match state.current_track_source {
            Some(TrackSource::Cursor) => Cursor::default(),
            _ => Cursor::from_playlist(&state.playlist),
        };
        let stored_track_id = state.current_track.as_ref().map(|t| t.id.clone());

        let mut stores = Stores {
            collection,
            playlist: state.playlist,
            cursor,
            now_playing: NowPlaying::restored(
                state.current_track_source,
                state.playing,
                state.repeat,
                Volume::new(state.volume, state.volume_mute),
            ),
            status: PlayingStatus::default(),
            events: Vec::new(),
            followups: VecDeque::new(),
            outgoing: Vec::new(),
            rejected: false,
            config,
        };
        handlers::restore_track(&mut stores, state.current_track);

        // elapsed time only carries over to the same track
        let track_id = stores.now_playing.track_id().map(str::to_string);
        let current_time = if track_id == stored_track_id {
            state.current_time
        } else {
            0.0
        };
        stores.status = PlayingStatus::resumed(track_id.clone(), current_time);

        info!(
            items = stores.playlist.len(),
            track = ?track_id,
            source = ?stores.now_playing.source(),
            playing = stores.now_playing.is_playing(),
            "Restored player state"
        );

        Ok(Self {
            stores,
            dispatcher: build_dispatcher()?,
            repository,
            outbox: Outbox::new(sink),
            back,
        })
    }

    /// Dispatch `payload` and any follow-ups it queues
    ///
    /// State is saved once afterwards if any store accepted a mutation.
    pub fn dispatch(&mut self, payload: Payload) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut queue = VecDeque::from([payload]);
        let track_before = self.stores.now_playing.track_id().map(str::to_string);

        while let Some(payload) = queue.pop_front() {
            if matches!(payload.action, Action::Unknown) {
                debug!(source = ?payload.source, "Ignoring unknown action");
                continue;
            }
            debug!(source = ?payload.source, action = ?payload.action, "Dispatching");

            self.stores.rejected = false;
            let step = self.dispatcher.dispatch(&mut self.stores, &payload);
            report.accepted.extend(step.accepted);
            queue.extend(self.stores.followups.drain(..));
        }

        // a pending back press belonged to the previous track
        if self.stores.now_playing.track_id() != track_before.as_deref() {
            self.back.cancel();
        }

        self.flush_outgoing();
        if report.mutated() {
            self.persist();
        }
        report
    }

    pub fn dispatch_view(&mut self, action: Action) -> DispatchReport {
        self.dispatch(Payload::view(action))
    }

    pub fn dispatch_server(&mut self, action: Action) -> DispatchReport {
        self.dispatch(Payload::server(action))
    }

    /// Handle a raw message from the server socket
    pub fn receive(&mut self, text: &str) -> Result<DispatchReport> {
        let action = WireMessage::decode(text)?.into_action()?;
        Ok(self.dispatch_server(action))
    }

    /// Back button pressed at `now`
    pub fn press_back(&mut self, now: Instant) -> DispatchReport {
        let restart = Action::Seek { position: 0.0 };
        let action = match self.back.press(now) {
            BackAction::Restart => restart,
            BackAction::Previous => match self.stores.now_playing.source() {
                Some(TrackSource::Playlist) => Action::PlaylistPrev,
                Some(TrackSource::Cursor) => match self.stores.cursor.previous() {
                    Some(previous) => Action::CursorSet {
                        index: previous.index,
                        path: previous.path.clone(),
                    },
                    None => restart,
                },
                _ => restart,
            },
        };
        self.dispatch_view(action)
    }

    fn flush_outgoing(&mut self) {
        for action in self.stores.outgoing.drain(..) {
            let sent = WireMessage::from_action(&action)
                .and_then(|message| self.outbox.send(&message));
            if let Err(e) = sent {
                warn!(error = %e, action = ?action, "Failed to queue outgoing message");
            }
        }
    }

    fn snapshot(&self) -> PersistedState {
        let now_playing = &self.stores.now_playing;
        PersistedState {
            playlist: self.stores.playlist.clone(),
            current_track: now_playing.track().cloned(),
            current_track_source: now_playing.source(),
            current_time: self.stores.status.current_time(),
            playing: now_playing.is_playing(),
            repeat: now_playing.repeat(),
            volume: now_playing.volume().level(),
            volume_mute: now_playing.volume().is_muted(),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save player state");
        }
    }

    /// Write the current state through the repository
    pub fn save(&mut self) -> Result<()> {
        let state = self.snapshot();
        self.repository.save(&state)
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.stores.events)
    }

    pub fn playlist(&self) -> &Playlist {
        &self.stores.playlist
    }

    pub fn cursor(&self) -> &Cursor {
        &self.stores.cursor
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.stores.now_playing
    }

    pub fn status(&self) -> &PlayingStatus {
        &self.stores.status
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.stores.config
    }

    pub fn collection(&self) -> &C {
        &self.stores.collection
    }

    /// Mutable collection cache; dispatch `CollectionLoaded` after filling it
    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.stores.collection
    }

    /// Order the stores see each payload in
    pub fn dispatch_order(&self) -> Vec<&'static str> {
        self.dispatcher.order()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Socket state changes go through here
    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Close the session and give back its storage
    pub fn into_storage(self) -> Box<dyn KeyValueStorage> {
        self.repository.into_storage()
    }
}
