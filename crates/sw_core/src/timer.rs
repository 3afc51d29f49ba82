//! Frame-based countdown used for superweapon recharge.
//!
//! The timer does not tick on its own: every query takes the current
//! frame, so a paused timer simply stops measuring elapsed frames.

use serde::{Deserialize, Serialize};

/// Simulation frame number.
pub type Frame = u64;

/// Pausable countdown measured in simulation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RechargeTimer {
    /// Frames the current run was started with.
    total: u32,
    /// Frames remaining when the current segment began.
    segment: u32,
    /// Frame the current segment began.
    segment_start: Frame,
    /// Remaining frames captured while paused.
    paused_left: Option<u32>,
    /// Whether the timer has been started and not stopped.
    active: bool,
}

impl RechargeTimer {
    /// (Re)start the countdown with `duration` frames.
    ///
    /// Any pause is discarded.
    pub fn start(&mut self, duration: u32, now: Frame) {
        self.total = duration;
        self.segment = duration;
        self.segment_start = now;
        self.paused_left = None;
        self.active = true;
    }

    /// Stop the countdown entirely.
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Freeze the remaining time. No-op when already paused or stopped.
    pub fn pause(&mut self, now: Frame) {
        if self.active && self.paused_left.is_none() {
            self.paused_left = Some(self.time_left(now));
        }
    }

    /// Continue counting down from the frozen remaining time.
    pub fn resume(&mut self, now: Frame) {
        if let Some(left) = self.paused_left.take() {
            self.segment = left;
            self.segment_start = now;
        }
    }

    /// Whether the countdown is currently frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused_left.is_some()
    }

    /// Whether the timer has been started and not stopped.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Frames the current run was started with.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Frames left until expiry.
    #[must_use]
    pub fn time_left(&self, now: Frame) -> u32 {
        if !self.active {
            return 0;
        }
        if let Some(left) = self.paused_left {
            return left;
        }
        let elapsed = u32::try_from(now.saturating_sub(self.segment_start)).unwrap_or(u32::MAX);
        self.segment.saturating_sub(elapsed)
    }

    /// Whether a running countdown has reached zero.
    #[must_use]
    pub fn expired(&self, now: Frame) -> bool {
        self.active && self.time_left(now) == 0
    }
}
