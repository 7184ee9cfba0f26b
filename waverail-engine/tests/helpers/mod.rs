//! Test helper modules for Waverail engine integration tests
//!
//! Provides reusable test infrastructure:
//! - MockPlayout: records every backend command, resolves completions
//! - ManualClock: audio clock advanced explicitly by the test
//! - Asset/track builders over silent buffers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use waverail_engine::audio::backend::{
    AudioClock, Completion, Playout, PlayoutError,
};
use waverail_engine::audio::AudioAsset;
use waverail_engine::playback::Track;

/// One recorded backend command
#[derive(Debug, Clone, PartialEq)]
pub enum PlayoutCall {
    Setup,
    Play { when: f64, offset: f64, duration: f64 },
    Stop { when: f64 },
    Gain(f64),
    MasterGain(f64),
    ShouldPlay(bool),
    FadeIn { start: f64, duration: f64, curve_len: usize },
    FadeOut { start: f64, duration: f64, curve_len: usize },
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<PlayoutCall>>,
    playing: AtomicBool,
    completion: Mutex<Option<oneshot::Sender<Result<(), PlayoutError>>>>,
}

/// Backend double recording commands and driving completion signals
pub struct MockPlayout {
    state: Arc<MockState>,
}

/// Test-side view of a [`MockPlayout`]
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<MockState>,
}

impl MockPlayout {
    pub fn new() -> (Box<dyn Playout>, MockHandle) {
        let state = Arc::new(MockState::default());
        (
            Box::new(MockPlayout {
                state: Arc::clone(&state),
            }),
            MockHandle { state },
        )
    }
}

impl Playout for MockPlayout {
    fn set_up_source(&mut self) -> Completion {
        let (tx, rx) = oneshot::channel();
        *self.state.completion.lock().unwrap() = Some(tx);
        self.state.calls.lock().unwrap().push(PlayoutCall::Setup);
        rx
    }

    fn play(&mut self, when: f64, offset: f64, duration: f64) {
        self.state.playing.store(true, Ordering::SeqCst);
        self.state.calls.lock().unwrap().push(PlayoutCall::Play {
            when,
            offset,
            duration,
        });
    }

    fn stop(&mut self, when: f64) {
        self.state.playing.store(false, Ordering::SeqCst);
        self.state
            .calls
            .lock()
            .unwrap()
            .push(PlayoutCall::Stop { when });

        // The backend reports the stop through the completion signal.
        if let Some(tx) = self.state.completion.lock().unwrap().take() {
            let _ = tx.send(Ok(()));
        }
    }

    fn set_volume_gain_level(&mut self, level: f64) {
        self.state
            .calls
            .lock()
            .unwrap()
            .push(PlayoutCall::Gain(level));
    }

    fn set_master_gain_level(&mut self, level: f64) {
        self.state
            .calls
            .lock()
            .unwrap()
            .push(PlayoutCall::MasterGain(level));
    }

    fn set_should_play(&mut self, should_play: bool) {
        self.state
            .calls
            .lock()
            .unwrap()
            .push(PlayoutCall::ShouldPlay(should_play));
    }

    fn apply_fade_in(&mut self, start: f64, duration: f64, curve: &[f32]) {
        self.state.calls.lock().unwrap().push(PlayoutCall::FadeIn {
            start,
            duration,
            curve_len: curve.len(),
        });
    }

    fn apply_fade_out(&mut self, start: f64, duration: f64, curve: &[f32]) {
        self.state.calls.lock().unwrap().push(PlayoutCall::FadeOut {
            start,
            duration,
            curve_len: curve.len(),
        });
    }

    fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::SeqCst)
    }
}

impl MockHandle {
    /// Snapshot of every recorded command
    pub fn calls(&self) -> Vec<PlayoutCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Drop the recorded history (keeps playing/completion state)
    pub fn clear_calls(&self) {
        self.state.calls.lock().unwrap().clear();
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::SeqCst)
    }

    /// Simulate the source playing out naturally
    pub fn finish_naturally(&self) {
        self.state.playing.store(false, Ordering::SeqCst);
        if let Some(tx) = self.state.completion.lock().unwrap().take() {
            let _ = tx.send(Ok(()));
        }
    }

    /// Simulate a backend failure, rejecting the completion signal
    pub fn fail(&self, reason: &str) {
        self.state.playing.store(false, Ordering::SeqCst);
        if let Some(tx) = self.state.completion.lock().unwrap().take() {
            let _ = tx.send(Err(PlayoutError::RenderFailed(reason.to_string())));
        }
    }

    /// Whether a `play` command was recorded
    pub fn play_command(&self) -> Option<(f64, f64, f64)> {
        self.calls().iter().find_map(|call| match call {
            PlayoutCall::Play {
                when,
                offset,
                duration,
            } => Some((*when, *offset, *duration)),
            _ => None,
        })
    }
}

/// Audio clock the test advances by hand
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(0.0),
        })
    }

    pub fn set(&self, seconds: f64) {
        *self.now.lock().unwrap() = seconds;
    }

    pub fn advance(&self, seconds: f64) {
        *self.now.lock().unwrap() += seconds;
    }
}

impl AudioClock for ManualClock {
    fn current_time(&self) -> f64 {
        *self.now.lock().unwrap()
    }
}

/// A silent mono track of `seconds` length with a fresh mock backend
pub fn silent_track(seconds: f64) -> (Track, MockHandle) {
    let (playout, handle) = MockPlayout::new();
    let asset = AudioAsset::silence(seconds, 44100, 1);
    (Track::new("test.wav", asset, playout), handle)
}
