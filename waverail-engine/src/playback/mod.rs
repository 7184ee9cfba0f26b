//! Track scheduling and transport control

pub mod track;
pub mod transport;
pub mod types;

pub use track::{Fade, FadeKind, Track};
pub use transport::{TrackLoad, TransportController};
pub use types::{InteractionMode, PlayoutOptions, ScheduleState, TimeSelection};
