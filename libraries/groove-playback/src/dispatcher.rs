//! Synchronous action dispatcher
//!
//! Subscribers are registered once at startup together with their
//! `wait_for` dependencies. [`DispatcherBuilder::build`] resolves the
//! dependencies into a single topological order (registration order breaks
//! ties) and rejects cycles, so dispatching is a plain loop:
//!
//! ```text
//! register: playlist(0), status(1), now_playing(2), cursor(3)
//! wait_for: cursor -> playlist, now_playing -> playlist + cursor,
//!           status -> now_playing
//! order:    playlist, cursor, now_playing, status
//! ```
//!
//! Every subscriber sees every payload; a subscriber's return value says
//! whether it accepted a mutation.

use crate::actions::Payload;
use crate::error::{PlaybackError, Result};
use tracing::trace;

/// Registration handle used to declare dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(usize);

type Handler<S> = Box<dyn Fn(&mut S, &Payload) -> bool>;

struct Subscriber<S> {
    name: &'static str,
    handler: Handler<S>,
    wait_for: Vec<usize>,
}

/// Collects subscribers and their dependencies
pub struct DispatcherBuilder<S> {
    subscribers: Vec<Subscriber<S>>,
}

impl<S> Default for DispatcherBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DispatcherBuilder<S> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber; returns its token
    pub fn register(
        &mut self,
        name: &'static str,
        handler: impl Fn(&mut S, &Payload) -> bool + 'static,
    ) -> Token {
        self.subscribers.push(Subscriber {
            name,
            handler: Box::new(handler),
            wait_for: Vec::new(),
        });
        Token(self.subscribers.len() - 1)
    }

    /// Make `dependent` run after every subscriber in `dependencies`
    pub fn wait_for(&mut self, dependent: Token, dependencies: &[Token]) -> Result<()> {
        let count = self.subscribers.len();
        if let Some(unknown) = std::iter::once(&dependent)
            .chain(dependencies)
            .find(|token| token.0 >= count)
        {
            return Err(PlaybackError::UnknownSubscriber(unknown.0));
        }

        let subscriber = &mut self.subscribers[dependent.0];
        for dependency in dependencies {
            if !subscriber.wait_for.contains(&dependency.0) {
                subscriber.wait_for.push(dependency.0);
            }
        }
        Ok(())
    }

    /// Resolve the dispatch order
    ///
    /// # Errors
    /// `DependencyCycle` naming the subscribers that wait on each other.
    pub fn build(self) -> Result<Dispatcher<S>> {
        let count = self.subscribers.len();
        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);

        while order.len() < count {
            let ready = (0..count).find(|&index| {
                !placed[index]
                    && self.subscribers[index]
                        .wait_for
                        .iter()
                        .all(|&dependency| placed[dependency])
            });

            let Some(index) = ready else {
                let stuck: Vec<&str> = (0..count)
                    .filter(|&index| !placed[index])
                    .map(|index| self.subscribers[index].name)
                    .collect();
                return Err(PlaybackError::DependencyCycle(stuck.join(", ")));
            };

            placed[index] = true;
            order.push(index);
        }

        let mut slots: Vec<Option<Subscriber<S>>> =
            self.subscribers.into_iter().map(Some).collect();
        let subscribers = order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();

        Ok(Dispatcher { subscribers })
    }
}

/// Names of the subscribers that accepted a payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub accepted: Vec<&'static str>,
}

impl DispatchReport {
    /// True if any subscriber mutated its state
    pub fn mutated(&self) -> bool {
        !self.accepted.is_empty()
    }
}

/// Subscribers in resolved dispatch order
pub struct Dispatcher<S> {
    subscribers: Vec<Subscriber<S>>,
}

impl<S> Dispatcher<S> {
    /// Start describing a dispatcher
    pub fn builder() -> DispatcherBuilder<S> {
        DispatcherBuilder::new()
    }

    /// Subscriber names in the order they run
    pub fn order(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name).collect()
    }

    /// Deliver `payload` to every subscriber
    pub fn dispatch(&self, state: &mut S, payload: &Payload) -> DispatchReport {
        let mut report = DispatchReport::default();
        for subscriber in &self.subscribers {
            if (subscriber.handler)(state, payload) {
                trace!(subscriber = subscriber.name, "Accepted payload");
                report.accepted.push(subscriber.name);
            }
        }
        report
    }
}
