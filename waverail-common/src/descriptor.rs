//! Serializable track descriptors
//!
//! A playlist is loaded from (and debug-dumped to) an array of track
//! descriptors. The same shape serves both directions: optional fields
//! absent on input fall back to defaults, derived fields such as `end` are
//! only present on output.

use serde::{Deserialize, Serialize};

use crate::fade_curves::FadeShape;

fn default_gain() -> f64 {
    1.0
}

fn default_mono() -> bool {
    true
}

/// Fade settings as persisted: shape plus window length in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeDescriptor {
    pub shape: FadeShape,
    pub duration: f64,
}

/// A persisted time selection in playlist seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionDescriptor {
    pub start: f64,
    pub end: f64,
}

/// Peak extraction settings persisted with a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSettings {
    /// Fold all channels into a single waveform
    #[serde(default = "default_mono")]
    pub mono: bool,
}

impl Default for PeakSettings {
    fn default() -> Self {
        Self { mono: true }
    }
}

/// Persisted/serializable description of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Source label (URL or file name); load resolution happens elsewhere
    pub src: String,

    /// Playlist start time in seconds
    #[serde(default)]
    pub start: f64,

    /// Buffer-relative cue-in in seconds
    #[serde(default)]
    pub cuein: f64,

    /// Buffer-relative cue-out in seconds; None means the buffer's end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cueout: Option<f64>,

    /// Playlist end time; derived, present on debug dumps only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,

    #[serde(default = "default_gain")]
    pub gain: f64,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub soloed: bool,

    /// Marks this track active and restores the given time selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectionDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peaks: Option<PeakSettings>,

    #[serde(rename = "fadeIn", default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<FadeDescriptor>,

    #[serde(rename = "fadeOut", default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<FadeDescriptor>,
}
