//! Edit/playback mode tracking
//!
//! The host advances the clock once per rendered frame; when playback
//! reaches the last keyframe the state drops back to edit mode on its
//! own, mirroring how the authoring tool returns control to the user.

use crate::timeline::Timeline;

/// Interaction mode of the authoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Posing bones and editing keyframes
    #[default]
    Edit,
    /// Scrubbing through the interpolated animation
    Playback,
}

/// Playback clock over the timeline's `[0, len - 1]` time range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    mode: Mode,
    time: f32,
}

impl PlaybackState {
    /// New state, in edit mode at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current playback time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether the clock is running
    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playback
    }

    /// Enter playback from the start of the timeline
    ///
    /// Refused (stays in edit mode) unless the timeline holds at least
    /// two keyframes to interpolate between.
    pub fn start(&mut self, timeline: &Timeline) -> bool {
        if timeline.len() < 2 {
            return false;
        }
        self.mode = Mode::Playback;
        self.time = 0.0;
        true
    }

    /// Drop back to edit mode, keeping the current time for scrubbing
    pub fn stop(&mut self) {
        self.mode = Mode::Edit;
    }

    /// Advance the clock by a frame delta
    ///
    /// Does nothing in edit mode. Reaching the end of the timeline
    /// resets the clock and returns to edit mode.
    pub fn advance(&mut self, delta: f32, timeline: &Timeline) {
        if self.mode != Mode::Playback {
            return;
        }
        self.time += delta;
        if self.time >= timeline.max_time() {
            self.time = 0.0;
            self.mode = Mode::Edit;
        }
    }
}
