//! # Waverail Engine
//!
//! Audio timeline engine for a multi-track waveform editor.
//!
//! **Purpose:** Place decoded audio sources on a shared timeline and
//! schedule sample-accurate, overlapping playback against the backend's
//! audio clock — trims, fades, gain, mute/solo, pause/seek/resume — while
//! producing the peak and fade-curve data the (external) renderer draws.
//!
//! **Architecture:** A [`playback::TransportController`] owns the track
//! set, the shared cursor and the update loop; each [`playback::Track`]
//! resolves requested playback windows into backend commands on its own
//! [`audio::Playout`] handle. Rendering, decoding and actual sound output
//! live outside the engine, behind the traits in [`audio`] and [`loader`].

pub mod audio;
pub mod config;
pub mod error;
pub mod loader;
pub mod playback;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use playback::{Track, TransportController};
