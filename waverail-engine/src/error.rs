//! Error types for the Waverail engine
//!
//! All variants are input-contract violations detected synchronously at the
//! call that introduces them; validation always precedes mutation, so a
//! failed operation leaves prior state intact. Backend rendering failures
//! travel separately, as rejected playout completion signals.

use thiserror::Error;
use uuid::Uuid;

use crate::audio::backend::PlayoutError;

/// Convenience Result type using the engine Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Waverail engine
#[derive(Error, Debug)]
pub enum Error {
    /// Cue out placed before cue in
    #[error("cue out ({cue_out}s) cannot be less than cue in ({cue_in}s)")]
    InvalidCueRange { cue_in: f64, cue_out: f64 },

    /// Fade window longer than the track's audible region
    #[error("fade of {requested}s does not fit a {duration}s track")]
    InvalidFadeDuration { requested: f64, duration: f64 },

    /// Loader factory cannot handle this source kind
    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    /// Offline scheduling requested on a track without an offline handle
    #[error("offline playout requested but none is attached")]
    MissingOfflinePlayout,

    /// No track with the given id in the playlist
    #[error("Track not found: {0}")]
    TrackNotFound(Uuid),

    /// Audio backend reported a failure
    #[error("Playout error: {0}")]
    Playout(#[from] PlayoutError),

    /// Curve or peak utility error
    #[error(transparent)]
    Common(#[from] waverail_common::Error),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
