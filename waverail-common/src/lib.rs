//! # Waverail Common Library
//!
//! Shared code for the Waverail timeline engine and its renderer including:
//! - Fade curve synthesis (gain envelopes for playback and UI preview)
//! - Peak extraction (waveform decimation for visualization)
//! - Time/pixel conversion utilities
//! - Serializable track descriptors
//! - Event types (EngineEvent enum) and the EventBus

pub mod descriptor;
pub mod error;
pub mod events;
pub mod fade_curves;
pub mod peaks;
pub mod time;

pub use descriptor::TrackDescriptor;
pub use error::{Error, Result};
pub use events::{EngineEvent, EventBus, LoadState, TransportState};
pub use fade_curves::{FadeDirection, FadeShape};
pub use peaks::PeakSet;
