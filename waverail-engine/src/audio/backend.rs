//! Audio rendering backend boundary
//!
//! The engine schedules playback against these traits; the implementations
//! (Web Audio bridge, native output, offline renderer) live outside the
//! engine. One `Playout` handle exists per track and mode — a track used
//! for both live playback and offline export carries two handles so the
//! modes never interleave state.

use thiserror::Error;
use tokio::sync::oneshot;

/// Backend failure reported through a completion signal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayoutError {
    /// Source node could not be created or started
    #[error("source setup failed: {0}")]
    SourceSetup(String),

    /// Rendering aborted mid-flight (device lost, offline render failed)
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// Completion signal for one scheduled pass
///
/// Resolves `Ok(())` when the source plays out naturally or is stopped,
/// `Err` when the backend fails. A dropped sender also counts as stopped.
pub type Completion = oneshot::Receiver<Result<(), PlayoutError>>;

/// Build a completion that is already resolved
///
/// Used for degenerate scheduling requests where a track has nothing to
/// play: the track is "stopped" from the moment it was asked.
pub fn resolved_completion() -> Completion {
    let (tx, rx) = oneshot::channel();
    let _ = tx.send(Ok(()));
    rx
}

/// Per-track playout handle
///
/// Times are in seconds on the backend's audio clock. `when` arguments are
/// absolute clock instants (the scheduler adds its delay to `now` before
/// issuing the command); fade instants may lie in the past for envelopes
/// already mid-flight at schedule time.
pub trait Playout: Send + Sync {
    /// Prepare a fresh source for the next pass and hand back its
    /// completion signal
    fn set_up_source(&mut self) -> Completion;

    /// Start the prepared source at `when`, reading the asset from
    /// `offset` for `duration` seconds
    fn play(&mut self, when: f64, offset: f64, duration: f64);

    /// Stop the current source `when` seconds from now; legal in any
    /// state, idempotent when already stopped
    fn stop(&mut self, when: f64);

    /// Per-track gain
    fn set_volume_gain_level(&mut self, level: f64);

    /// Playlist-wide gain, applied multiplicatively after track gain
    fn set_master_gain_level(&mut self, level: f64);

    /// Mute/solo gate; a gated track is scheduled but inaudible
    fn set_should_play(&mut self, should_play: bool);

    /// Ramp gain along `curve` over `[start, start + duration)`
    fn apply_fade_in(&mut self, start: f64, duration: f64, curve: &[f32]);

    fn apply_fade_out(&mut self, start: f64, duration: f64, curve: &[f32]);

    /// Whether a scheduled source is currently rendering
    fn is_playing(&self) -> bool;
}

/// Monotonic audio clock shared by every scheduling decision
pub trait AudioClock: Send + Sync {
    /// Seconds since the backend started; never decreases
    fn current_time(&self) -> f64;
}

/// Recording collaborator halted by a transport stop
pub trait Recorder: Send + Sync {
    fn is_recording(&self) -> bool;

    fn stop(&mut self);
}
