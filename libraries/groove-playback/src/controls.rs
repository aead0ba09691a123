//! "Back" button gesture
//!
//! A single press restarts the current track; a second press within the
//! window goes to the previous track.

use std::time::{Duration, Instant};

/// What a back press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// Seek the current track to its start
    Restart,

    /// Navigate to the previous track
    Previous,
}

/// Double-press detector for the back control
#[derive(Debug, Clone)]
pub struct BackControl {
    window: Duration,
    last_press: Option<Instant>,
}

impl BackControl {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    /// Register a press at `now`
    pub fn press(&mut self, now: Instant) -> BackAction {
        match self.last_press.take() {
            Some(last) if now.saturating_duration_since(last) <= self.window => {
                BackAction::Previous
            }
            _ => {
                self.last_press = Some(now);
                BackAction::Restart
            }
        }
    }

    /// Forget a pending first press
    pub fn cancel(&mut self) {
        self.last_press = None;
    }
}
