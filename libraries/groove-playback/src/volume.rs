//! Volume control
//!
//! The level is the linear 0.0-1.0 value handed to the platform media
//! element. Muting preserves the level.

/// Volume level with a mute flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// Out-of-range levels are clamped, NaN falls back to the default 0.75.
    pub fn new(level: f32, muted: bool) -> Self {
        let mut volume = Self::default();
        volume.set_level(level);
        volume.muted = muted;
        volume
    }

    /// Set volume level (0.0-1.0)
    ///
    /// Returns false if the level was rejected or unchanged.
    pub fn set_level(&mut self, level: f32) -> bool {
        if level.is_nan() {
            return false;
        }
        let level = level.clamp(0.0, 1.0);
        if level == self.level {
            return false;
        }
        self.level = level;
        true
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set mute state, returns true if it changed
    pub fn set_muted(&mut self, muted: bool) -> bool {
        let changed = self.muted != muted;
        self.muted = muted;
        changed
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the media element should play at
    ///
    /// Returns 0.0 if muted.
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            level: 0.75,
            muted: false,
        }
    }
}
