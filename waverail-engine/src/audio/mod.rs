//! Audio boundary: decoded assets and the playout backend traits

pub mod asset;
pub mod backend;

pub use asset::AudioAsset;
pub use backend::{AudioClock, Completion, Playout, PlayoutError, Recorder};
