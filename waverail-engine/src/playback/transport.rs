//! Transport control over the whole track set
//!
//! Owns the shared time cursor, the play/pause/stop/seek state machine,
//! mute/solo policy, master gain, and the update loop that reports playback
//! time and detects end-of-playback. Every control operation runs to
//! completion before returning; only the update-loop task and the audio
//! backend run asynchronously relative to the caller.
//!
//! The update-loop task handle is an owned pending-task slot: it is aborted
//! and replaced atomically on every transition, so a stale tick can never
//! fire after a new `play`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;
use waverail_common::descriptor::{SelectionDescriptor, TrackDescriptor};
use waverail_common::events::{EngineEvent, EventBus, TransportState};
use waverail_common::fade_curves::FadeShape;

use crate::audio::backend::{AudioClock, Completion, Playout, Recorder};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::loader::AssetLoader;
use crate::playback::track::Track;
use crate::playback::types::{InteractionMode, PlayoutOptions, TimeSelection};

/// Everything the transport tracks besides the tracks themselves
struct TransportInner {
    state: TransportState,

    /// Last position explicitly selected by the user
    cursor: f64,

    /// Position captured by the most recent pause, if any
    paused_at: Option<f64>,

    /// Position of an in-flight seek during playback, if any
    last_seeked: Option<f64>,

    /// Audio-clock anchor of the most recent schedule pass
    last_play: f64,

    /// Playback time as last reported by the update loop
    playback_seconds: f64,

    selection: TimeSelection,
    active_track: Option<Uuid>,

    master_gain: f64,
    fade_shape: FadeShape,
    exclusive_solo: bool,
    muted: HashSet<Uuid>,
    soloed: HashSet<Uuid>,

    /// Max end time over all tracks
    duration: f64,

    interaction_mode: InteractionMode,

    scroll_left: f64,
    view_duration: f64,
}

/// Mute/solo policy: soloed tracks win when any exist, otherwise everything
/// unmuted plays
fn resolve_should_play(inner: &TransportInner, id: Uuid) -> bool {
    if !inner.soloed.is_empty() {
        inner.soloed.contains(&id)
    } else {
        !inner.muted.contains(&id)
    }
}

/// One entry of a playlist load request
pub struct TrackLoad {
    pub descriptor: TrackDescriptor,
    pub loader: Box<dyn AssetLoader>,
    pub playout: Box<dyn Playout>,
}

/// Playlist-level playback controller
pub struct TransportController {
    config: EngineConfig,
    clock: Arc<dyn AudioClock>,
    events: EventBus,

    tracks: Arc<RwLock<Vec<Track>>>,
    inner: Arc<RwLock<TransportInner>>,

    /// Completion signals of the current pass, consumed by the next
    /// reset or restart
    completions: Mutex<Vec<Completion>>,

    /// Owned pending-task slot for the update loop
    animation: StdMutex<Option<JoinHandle<()>>>,

    recorder: StdMutex<Option<Box<dyn Recorder>>>,
}

impl TransportController {
    pub fn new(clock: Arc<dyn AudioClock>, config: EngineConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        let inner = TransportInner {
            state: TransportState::Stopped,
            cursor: 0.0,
            paused_at: None,
            last_seeked: None,
            last_play: 0.0,
            playback_seconds: 0.0,
            selection: TimeSelection::default(),
            active_track: None,
            master_gain: config.master_gain,
            fade_shape: config.fade_shape,
            exclusive_solo: config.exclusive_solo,
            muted: HashSet::new(),
            soloed: HashSet::new(),
            duration: 0.0,
            interaction_mode: InteractionMode::Cursor,
            scroll_left: 0.0,
            view_duration: 0.0,
        };

        Self {
            config,
            clock,
            events,
            tracks: Arc::new(RwLock::new(Vec::new())),
            inner: Arc::new(RwLock::new(inner)),
            completions: Mutex::new(Vec::new()),
            animation: StdMutex::new(None),
            recorder: StdMutex::new(None),
        }
    }

    /// Bus carrying every engine event; clone to subscribe
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    // ------------------------------ loading ------------------------------

    /// Load a set of sources and build one track per descriptor
    ///
    /// Runs each loader to completion, then applies descriptor state
    /// (start, cues, fades, gain, mute/solo, selection), computes peaks and
    /// recomputes the playlist duration. Returns the new track ids in
    /// request order.
    pub async fn load(&self, requests: Vec<TrackLoad>) -> Result<Vec<Uuid>> {
        let mut decoded = Vec::with_capacity(requests.len());

        for mut request in requests {
            let asset = request.loader.load()?;
            decoded.push((request.descriptor, asset, request.playout));
        }
        self.events.emit_or_log(EngineEvent::AudioSourcesLoaded {
            timestamp: Utc::now(),
        });

        let mut ids = Vec::with_capacity(decoded.len());
        {
            let mut tracks = self.tracks.write().await;
            let mut inner = self.inner.write().await;

            for (descriptor, asset, playout) in decoded {
                let mut track = Track::new(descriptor.src.clone(), asset, playout);
                track.set_fade_resolution(self.config.fade_curve_resolution);

                if descriptor.peaks.is_none() {
                    track.set_peak_settings(waverail_common::descriptor::PeakSettings {
                        mono: self.config.mono,
                    });
                }
                track.apply_descriptor(&descriptor)?;

                if descriptor.muted {
                    inner.muted.insert(track.id());
                }
                if descriptor.soloed {
                    if inner.exclusive_solo {
                        inner.soloed.clear();
                    }
                    inner.soloed.insert(track.id());
                }
                if let Some(selection) = descriptor.selected {
                    inner.active_track = Some(track.id());
                    inner.selection = TimeSelection::new(selection.start, selection.end);
                    inner.cursor = inner.selection.start;
                }

                track.set_master_gain_level(inner.master_gain);
                track.calculate_peaks(self.config.samples_per_pixel, self.config.peak_bits)?;

                ids.push(track.id());
                tracks.push(track);
            }

            for track in tracks.iter_mut() {
                let should_play = resolve_should_play(&inner, track.id());
                track.set_should_play(should_play);
            }
        }

        self.adjust_duration().await;
        self.events.emit_or_log(EngineEvent::AudioSourcesRendered {
            timestamp: Utc::now(),
        });

        Ok(ids)
    }

    /// Add an already-built track to the playlist
    pub async fn add_track(&self, mut track: Track) -> Uuid {
        track.set_fade_resolution(self.config.fade_curve_resolution);
        let id = track.id();

        {
            let mut tracks = self.tracks.write().await;
            let inner = self.inner.read().await;

            track.set_master_gain_level(inner.master_gain);
            let should_play = resolve_should_play(&inner, id);
            track.set_should_play(should_play);
            tracks.push(track);
        }

        self.adjust_duration().await;
        id
    }

    /// Drop every track and reset the transport to its initial state
    pub async fn clear(&self) -> Result<()> {
        self.stop().await?;

        {
            let mut tracks = self.tracks.write().await;
            let mut inner = self.inner.write().await;

            tracks.clear();
            inner.muted.clear();
            inner.soloed.clear();
            inner.duration = 0.0;
            inner.playback_seconds = 0.0;
            inner.scroll_left = 0.0;
            inner.active_track = None;
        }

        self.seek(0.0, Some(0.0), None).await?;
        self.events.emit_or_log(EngineEvent::DurationChanged {
            seconds: 0.0,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ------------------------------ queries ------------------------------

    /// Whether any track's backend is currently rendering
    pub async fn is_playing(&self) -> bool {
        self.tracks.read().await.iter().any(Track::is_playing)
    }

    pub async fn state(&self) -> TransportState {
        self.inner.read().await.state
    }

    /// Current point of time in the playlist in seconds
    pub async fn current_time(&self) -> f64 {
        let inner = self.inner.read().await;
        let cursor_pos = inner
            .last_seeked
            .or(inner.paused_at)
            .unwrap_or(inner.cursor);

        cursor_pos + (self.clock.current_time() - inner.last_play)
    }

    pub async fn duration(&self) -> f64 {
        self.inner.read().await.duration
    }

    pub async fn playback_seconds(&self) -> f64 {
        self.inner.read().await.playback_seconds
    }

    pub async fn selection(&self) -> TimeSelection {
        self.inner.read().await.selection
    }

    pub async fn is_segment_selection(&self) -> bool {
        self.inner.read().await.selection.is_segment()
    }

    pub async fn active_track(&self) -> Option<Uuid> {
        self.inner.read().await.active_track
    }

    /// Whether a track participates in the current selection
    ///
    /// A segment selection belongs to the single active track; a point
    /// selection leaves every track active.
    pub async fn is_active_track(&self, id: Uuid) -> bool {
        let inner = self.inner.read().await;
        if inner.selection.is_segment() {
            inner.active_track == Some(id)
        } else {
            true
        }
    }

    pub async fn master_gain(&self) -> f64 {
        self.inner.read().await.master_gain
    }

    pub async fn scroll_left(&self) -> f64 {
        self.inner.read().await.scroll_left
    }

    pub async fn track_ids(&self) -> Vec<Uuid> {
        self.tracks.read().await.iter().map(Track::id).collect()
    }

    /// Serializable snapshot of every track, mute/solo flags resolved
    pub async fn get_info(&self) -> Vec<TrackDescriptor> {
        let tracks = self.tracks.read().await;
        let inner = self.inner.read().await;

        tracks
            .iter()
            .map(|track| {
                let mut details = track.details();
                details.muted = inner.muted.contains(&track.id());
                details.soloed = inner.soloed.contains(&track.id());
                if inner.active_track == Some(track.id()) {
                    details.selected = Some(SelectionDescriptor {
                        start: inner.selection.start,
                        end: inner.selection.end,
                    });
                }
                details
            })
            .collect()
    }

    // ----------------------------- transport -----------------------------

    /// Start (or restart) playback
    ///
    /// Effective start is the explicit argument, else the pause position,
    /// else the cursor. Effective end is the explicit argument, else the
    /// segment-selection end when one reaches past the start. When anything
    /// is already playing this is a restart: all tracks stop, all prior
    /// completion signals resolve, and the pass is re-issued from the new
    /// start.
    pub async fn play(&self, start: Option<f64>, end: Option<f64>) -> Result<()> {
        let (start, end) = {
            let inner = self.inner.read().await;
            let start = start.or(inner.paused_at).unwrap_or(inner.cursor);
            let end = end.or_else(|| {
                (inner.selection.is_segment() && inner.selection.end > start)
                    .then_some(inner.selection.end)
            });
            (start, end)
        };

        if self.is_playing().await {
            debug!(start, "restarting playback");
            self.restart_play_from(start, end).await
        } else {
            self.schedule_all(start, end).await
        }
    }

    /// Pause playback, remembering where to resume
    ///
    /// A no-op when nothing is playing.
    pub async fn pause(&self) -> Result<()> {
        if !self.is_playing().await {
            return Ok(());
        }

        let position = self.current_time().await;
        {
            let mut inner = self.inner.write().await;
            inner.paused_at = Some(position);
            inner.state = TransportState::Paused;
        }
        self.events.emit_or_log(EngineEvent::TransportStateChanged {
            state: TransportState::Paused,
            timestamp: Utc::now(),
        });
        info!(seconds = position, "paused");

        self.playback_reset().await
    }

    /// Stop playback and clear the pause/elapsed markers
    ///
    /// Also halts an active recording collaborator, if one is attached.
    pub async fn stop(&self) -> Result<()> {
        {
            let mut recorder = self.recorder.lock().expect("recorder lock");
            if let Some(recorder) = recorder.as_mut() {
                if recorder.is_recording() {
                    recorder.stop();
                }
            }
        }

        {
            let mut inner = self.inner.write().await;
            inner.paused_at = None;
            inner.playback_seconds = 0.0;
            inner.state = TransportState::Stopped;
        }
        self.events.emit_or_log(EngineEvent::TransportStateChanged {
            state: TransportState::Stopped,
            timestamp: Utc::now(),
        });

        self.playback_reset().await
    }

    /// Move the cursor, restarting playback when something is playing
    pub async fn seek(&self, start: f64, end: Option<f64>, track: Option<Uuid>) -> Result<()> {
        if self.is_playing().await {
            {
                let mut inner = self.inner.write().await;
                inner.last_seeked = Some(start);
                inner.paused_at = None;
            }
            self.restart_play_from(start, None).await
        } else {
            {
                let tracks = self.tracks.read().await;
                let mut inner = self.inner.write().await;
                inner.active_track = track.or_else(|| tracks.first().map(Track::id));
                inner.paused_at = Some(start);
            }
            self.set_time_selection(start, end).await;
            Ok(())
        }
    }

    /// User selection intent: seek plus an immediate time report
    pub async fn select(&self, start: f64, end: Option<f64>, track: Option<Uuid>) -> Result<()> {
        if self.is_playing().await {
            {
                let mut inner = self.inner.write().await;
                inner.last_seeked = Some(start);
                inner.paused_at = None;
            }
            self.restart_play_from(start, None).await
        } else {
            self.seek(start, end, track).await?;
            self.events.emit_or_log(EngineEvent::TimeUpdate {
                seconds: start,
                timestamp: Utc::now(),
            });
            Ok(())
        }
    }

    /// Stop and select the start of the playlist
    pub async fn rewind(&self) -> Result<()> {
        self.stop().await?;
        self.inner.write().await.scroll_left = 0.0;
        self.select(0.0, Some(0.0), None).await
    }

    /// Stop and select the end of the playlist, scrolling it into view
    pub async fn fast_forward(&self) -> Result<()> {
        self.stop().await?;

        let duration = {
            let mut inner = self.inner.write().await;
            inner.scroll_left = if inner.view_duration < inner.duration {
                inner.duration - inner.view_duration
            } else {
                0.0
            };
            inner.duration
        };

        self.select(duration, Some(duration), None).await
    }

    /// Replace the time selection; a missing end collapses it to a point
    pub async fn set_time_selection(&self, start: f64, end: Option<f64>) {
        let selection = TimeSelection::new(start, end.unwrap_or(start));
        let track_id = {
            let mut inner = self.inner.write().await;
            inner.selection = selection;
            inner.cursor = selection.start;
            inner.active_track
        };

        self.events.emit_or_log(EngineEvent::SelectionChanged {
            start: selection.start,
            end: selection.end,
            track_id,
            timestamp: Utc::now(),
        });
    }

    /// Viewport width in seconds, used by fast-forward scrolling
    pub async fn set_view_duration(&self, seconds: f64) {
        self.inner.write().await.view_duration = seconds;
    }

    // ----------------------------- scheduling ----------------------------

    async fn restart_play_from(&self, start: f64, end: Option<f64>) -> Result<()> {
        self.stop_animation();

        {
            let mut tracks = self.tracks.write().await;
            for track in tracks.iter_mut() {
                track.schedule_stop(0.0);
            }
        }
        self.await_playout().await?;

        self.schedule_all(start, end).await
    }

    async fn schedule_all(&self, start: f64, end: Option<f64>) -> Result<()> {
        let now = self.clock.current_time();
        let mut scheduled = Vec::new();

        {
            let mut tracks = self.tracks.write().await;
            let mut inner = self.inner.write().await;

            for track in tracks.iter_mut() {
                track.set_mode(InteractionMode::Cursor);
                let options = PlayoutOptions {
                    should_play: resolve_should_play(&inner, track.id()),
                    master_gain: inner.master_gain,
                    is_offline: false,
                };
                scheduled.push(track.schedule_play(now, start, end, &options)?);
            }

            inner.last_play = now;
            inner.state = TransportState::Playing;
        }

        *self.completions.lock().await = scheduled;
        self.events.emit_or_log(EngineEvent::TransportStateChanged {
            state: TransportState::Playing,
            timestamp: Utc::now(),
        });
        info!(start, ?end, "playback scheduled");

        self.start_animation(start);
        Ok(())
    }

    /// Full reset shared by pause and stop: cancel the update loop, stop
    /// every track, restore editing modes, drain completion signals
    async fn playback_reset(&self) -> Result<()> {
        self.stop_animation();

        {
            let mut tracks = self.tracks.write().await;
            let mut inner = self.inner.write().await;
            inner.last_seeked = None;
            let mode = inner.interaction_mode;

            for track in tracks.iter_mut() {
                track.schedule_stop(0.0);
                track.set_mode(mode);
            }
        }

        self.await_playout().await
    }

    /// Wait for every completion signal of the previous pass
    ///
    /// A backend failure surfaces here as `Error::Playout`; a dropped
    /// sender just means the source was stopped and resolves silently.
    async fn await_playout(&self) -> Result<()> {
        let pending = std::mem::take(&mut *self.completions.lock().await);

        for outcome in join_all(pending).await {
            if let Ok(Err(error)) = outcome {
                return Err(Error::Playout(error));
            }
        }
        Ok(())
    }

    // ----------------------------- update loop ---------------------------

    fn start_animation(&self, start_seconds: f64) {
        let tracks = Arc::clone(&self.tracks);
        let inner = Arc::clone(&self.inner);
        let clock = Arc::clone(&self.clock);
        let events = self.events.clone();
        let tick_period = Duration::from_millis(self.config.tick_interval_ms);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            ticker.tick().await;

            let mut last_draw = clock.current_time();
            let mut cursor = start_seconds;

            loop {
                ticker.tick().await;

                let now = clock.current_time();
                let elapsed = now - last_draw;
                let playing = tracks.read().await.iter().any(Track::is_playing);

                if playing {
                    cursor += elapsed;
                    last_draw = now;
                    inner.write().await.playback_seconds = cursor;
                    events.emit_or_log(EngineEvent::TimeUpdate {
                        seconds: cursor,
                        timestamp: Utc::now(),
                    });
                    continue;
                }

                // Playback ended on its own: decide whether the active
                // boundary was reached, settle on a zero-delay tick, then
                // clear the transient markers and report time zero.
                let boundary = {
                    let inner = inner.read().await;
                    if inner.selection.is_segment() {
                        inner.selection.end
                    } else {
                        inner.duration
                    }
                };
                if cursor + elapsed >= boundary {
                    events.emit_or_log(EngineEvent::Finished {
                        timestamp: Utc::now(),
                    });
                }

                tokio::time::sleep(Duration::ZERO).await;
                {
                    let mut inner = inner.write().await;
                    inner.paused_at = None;
                    inner.last_seeked = None;
                    inner.playback_seconds = 0.0;
                    inner.state = TransportState::Stopped;
                }
                events.emit_or_log(EngineEvent::TransportStateChanged {
                    state: TransportState::Stopped,
                    timestamp: Utc::now(),
                });
                events.emit_or_log(EngineEvent::TimeUpdate {
                    seconds: 0.0,
                    timestamp: Utc::now(),
                });
                break;
            }
        });

        let previous = self.animation.lock().expect("animation lock").replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancel the pending update-loop tick, if any
    fn stop_animation(&self) {
        if let Some(handle) = self.animation.lock().expect("animation lock").take() {
            handle.abort();
        }
    }

    // ----------------------------- mute / solo ---------------------------

    /// Toggle a track's membership in the muted set
    pub async fn mute_track(&self, id: Uuid) -> Result<()> {
        self.ensure_track(id).await?;

        {
            let mut inner = self.inner.write().await;
            if !inner.muted.remove(&id) {
                inner.muted.insert(id);
            }
        }
        self.adjust_track_playout().await;
        Ok(())
    }

    /// Toggle a track's membership in the soloed set
    ///
    /// In exclusive-solo mode, soloing replaces the set with this track.
    pub async fn solo_track(&self, id: Uuid) -> Result<()> {
        self.ensure_track(id).await?;

        {
            let mut inner = self.inner.write().await;
            if inner.soloed.remove(&id) {
                // un-soloed
            } else if inner.exclusive_solo {
                inner.soloed.clear();
                inner.soloed.insert(id);
            } else {
                inner.soloed.insert(id);
            }
        }
        self.adjust_track_playout().await;
        Ok(())
    }

    pub async fn set_exclusive_solo(&self, exclusive: bool) {
        self.inner.write().await.exclusive_solo = exclusive;
    }

    /// Push the resolved mute/solo gate to every track's backend
    pub async fn adjust_track_playout(&self) {
        let mut tracks = self.tracks.write().await;
        let inner = self.inner.read().await;

        for track in tracks.iter_mut() {
            let should_play = resolve_should_play(&inner, track.id());
            track.set_should_play(should_play);
        }
    }

    /// Resolved mute/solo gate for one track
    pub async fn should_track_play(&self, id: Uuid) -> bool {
        resolve_should_play(&*self.inner.read().await, id)
    }

    // ------------------------------- editing ------------------------------

    /// Playlist-wide gain, applied on top of per-track gain
    pub async fn set_master_gain(&self, gain: f64) {
        {
            let mut tracks = self.tracks.write().await;
            let mut inner = self.inner.write().await;
            inner.master_gain = gain;

            for track in tracks.iter_mut() {
                track.set_master_gain_level(gain);
            }
        }

        self.events.emit_or_log(EngineEvent::MasterVolumeChanged {
            gain,
            timestamp: Utc::now(),
        });
    }

    /// Shape used by subsequent fade edits
    pub async fn set_fade_type(&self, shape: FadeShape) {
        self.inner.write().await.fade_shape = shape;
    }

    pub async fn set_track_gain(&self, id: Uuid, gain: f64) -> Result<()> {
        let mut tracks = self.tracks.write().await;
        let track = find_track(&mut tracks, id)?;
        track.set_gain_level(gain);
        Ok(())
    }

    /// Apply a fade-in of `duration` seconds with the current fade shape
    pub async fn set_track_fade_in(&self, id: Uuid, duration: f64) -> Result<()> {
        let shape = self.inner.read().await.fade_shape;
        let mut tracks = self.tracks.write().await;
        let track = find_track(&mut tracks, id)?;
        track.set_fade_in(duration, shape)
    }

    /// Apply a fade-out of `duration` seconds with the current fade shape
    pub async fn set_track_fade_out(&self, id: Uuid, duration: f64) -> Result<()> {
        let shape = self.inner.read().await.fade_shape;
        let mut tracks = self.tracks.write().await;
        let track = find_track(&mut tracks, id)?;
        track.set_fade_out(duration, shape)
    }

    /// Shift a track along the timeline by `delta` seconds
    pub async fn shift_track(&self, id: Uuid, delta: f64) -> Result<()> {
        {
            let mut tracks = self.tracks.write().await;
            let track = find_track(&mut tracks, id)?;
            let start = track.start_time();
            track.set_start_time(start + delta);
        }

        self.adjust_duration().await;
        Ok(())
    }

    /// Trim the active track to the current segment selection
    ///
    /// Recomputes the track's peaks and collapses the selection afterwards.
    pub async fn trim(&self) -> Result<()> {
        let (selection, active) = {
            let inner = self.inner.read().await;
            (inner.selection, inner.active_track)
        };
        let Some(id) = active else {
            debug!("trim with no active track ignored");
            return Ok(());
        };

        {
            let mut tracks = self.tracks.write().await;
            let track = find_track(&mut tracks, id)?;
            track.trim(selection.start, selection.end)?;
            track.calculate_peaks(self.config.samples_per_pixel, self.config.peak_bits)?;
        }

        self.set_time_selection(0.0, Some(0.0)).await;
        self.adjust_duration().await;
        Ok(())
    }

    /// Recompute playlist duration as the max track end time
    pub async fn adjust_duration(&self) -> f64 {
        let duration = self
            .tracks
            .read()
            .await
            .iter()
            .fold(0.0f64, |acc, track| acc.max(track.end_time()));

        let changed = {
            let mut inner = self.inner.write().await;
            let changed = inner.duration != duration;
            inner.duration = duration;
            changed
        };

        if changed {
            self.events.emit_or_log(EngineEvent::DurationChanged {
                seconds: duration,
                timestamp: Utc::now(),
            });
        }
        duration
    }

    /// A track's current interaction mode
    pub async fn track_mode(&self, id: Uuid) -> Result<InteractionMode> {
        self.tracks
            .read()
            .await
            .iter()
            .find(|t| t.id() == id)
            .map(Track::mode)
            .ok_or(Error::TrackNotFound(id))
    }

    /// Editing mode restored on every track after playback ends
    pub async fn set_interaction_mode(&self, mode: InteractionMode) {
        let mut tracks = self.tracks.write().await;
        let mut inner = self.inner.write().await;
        inner.interaction_mode = mode;

        for track in tracks.iter_mut() {
            track.set_mode(mode);
        }
    }

    /// Attach the recording collaborator halted by `stop`
    pub fn set_recorder(&self, recorder: Box<dyn Recorder>) {
        *self.recorder.lock().expect("recorder lock") = Some(recorder);
    }

    async fn ensure_track(&self, id: Uuid) -> Result<()> {
        if self.tracks.read().await.iter().any(|t| t.id() == id) {
            Ok(())
        } else {
            Err(Error::TrackNotFound(id))
        }
    }
}

fn find_track(tracks: &mut [Track], id: Uuid) -> Result<&mut Track> {
    tracks
        .iter_mut()
        .find(|t| t.id() == id)
        .ok_or(Error::TrackNotFound(id))
}

impl Drop for TransportController {
    fn drop(&mut self) {
        if let Some(handle) = self.animation.lock().expect("animation lock").take() {
            handle.abort();
        }
    }
}
