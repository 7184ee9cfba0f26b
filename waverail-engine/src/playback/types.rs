//! Playback types shared across modules

use serde::{Deserialize, Serialize};

/// Per-track scheduling state
///
/// Idle -> Scheduled on `schedule_play`; Scheduled/Playing -> Stopped on
/// `schedule_stop`; Stopped -> Idle implicitly on the next `schedule_play`.
/// Scheduled becomes Playing once the backend reports the source rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    /// Nothing scheduled
    Idle,

    /// Play command issued, source not rendering yet
    Scheduled,

    /// Backend is rendering the source
    Playing,

    /// Explicitly stopped; cleared by the next schedule
    Stopped,
}

/// Options accompanying one `schedule_play` call
#[derive(Debug, Clone, Copy)]
pub struct PlayoutOptions {
    /// Mute/solo gate resolved by the transport
    pub should_play: bool,

    /// Playlist-wide gain at schedule time
    pub master_gain: f64,

    /// Target the track's offline handle instead of the live one
    pub is_offline: bool,
}

impl Default for PlayoutOptions {
    fn default() -> Self {
        Self {
            should_play: true,
            master_gain: 1.0,
            is_offline: false,
        }
    }
}

/// A selected time range in playlist seconds
///
/// `start == end` is a point selection (a cursor position); anything wider
/// is a segment selection that bounds playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub start: f64,
    pub end: f64,
}

impl TimeSelection {
    /// Selection covering `[start, end]`; a reversed range is normalized
    /// so `start <= end` always holds
    pub fn new(start: f64, end: f64) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Point selection at `at`
    pub fn point(at: f64) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    pub fn is_segment(&self) -> bool {
        !self.is_point()
    }
}

impl Default for TimeSelection {
    fn default() -> Self {
        Self::point(0.0)
    }
}

/// Interaction mode a track is in, as far as the engine needs to know
///
/// Pointer handling lives with the renderer; the engine only stores which
/// mode is active so it can force `Cursor` during playback and restore the
/// editing mode afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Cursor,
    Select,
    Shift,
    FadeIn,
    FadeOut,
}

impl Default for InteractionMode {
    fn default() -> Self {
        InteractionMode::Cursor
    }
}
