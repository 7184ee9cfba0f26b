//! Event types for the Waverail engine
//!
//! The engine communicates outward through a typed event enum broadcast on
//! an [`EventBus`] (tokio broadcast channel) instead of string-keyed
//! emitter wiring. The renderer and any other observer subscribe and match
//! on the variants they care about; commands travel the other way as plain
//! method calls on the transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Transport state over the whole track set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportState::Stopped => write!(f, "stopped"),
            TransportState::Playing => write!(f, "playing"),
            TransportState::Paused => write!(f, "paused"),
        }
    }
}

/// Loader progress ladder for one audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Uninitialized,
    Loading,
    Decoding,
    Finished,
}

/// Engine event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// Transport state changed
    TransportStateChanged {
        state: TransportState,
        timestamp: DateTime<Utc>,
    },

    /// Playback time advanced (one per update-loop tick while playing,
    /// plus the final reset to zero)
    TimeUpdate {
        seconds: f64,
        timestamp: DateTime<Utc>,
    },

    /// Playback reached the active boundary (segment end or playlist end)
    Finished { timestamp: DateTime<Utc> },

    /// Playlist duration recomputed after an edit
    DurationChanged {
        seconds: f64,
        timestamp: DateTime<Utc>,
    },

    /// Time selection replaced
    SelectionChanged {
        start: f64,
        end: f64,
        track_id: Option<Uuid>,
        timestamp: DateTime<Utc>,
    },

    /// Master gain changed
    MasterVolumeChanged {
        gain: f64,
        timestamp: DateTime<Utc>,
    },

    /// A loader moved through its state ladder
    LoadStateChanged {
        src: String,
        state: LoadState,
        timestamp: DateTime<Utc>,
    },

    /// Byte-level load progress for one source
    LoadProgress {
        src: String,
        percent_complete: f64,
        timestamp: DateTime<Utc>,
    },

    /// All requested sources finished decoding
    AudioSourcesLoaded { timestamp: DateTime<Utc> },

    /// Tracks were built from the decoded sources and peaks computed
    AudioSourcesRendered { timestamp: DateTime<Utc> },
}

/// One-to-many event broadcasting for engine observers
///
/// Wraps `tokio::sync::broadcast`. Subscribers receive events emitted after
/// they subscribe; slow subscribers may observe `Lagged` and should treat
/// the next received event as authoritative.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count, or an error when nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: EngineEvent,
    ) -> Result<usize, broadcast::error::SendError<EngineEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, logging instead of failing when nobody listens
    pub fn emit_or_log(&self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event emitted with no subscribers");
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
