//! Per-track timing state and playout scheduling
//!
//! A `Track` owns one audio asset's placement on the playlist timeline
//! (start time, cue range, gain, fades) and computes, for any requested
//! playback window, the exact source offset, schedule delay and duration to
//! hand the audio backend — including how to time fades whose envelopes are
//! already mid-flight when playback starts inside them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;
use waverail_common::descriptor::{FadeDescriptor, PeakSettings, TrackDescriptor};
use waverail_common::fade_curves::{self, FadeDirection, FadeShape};
use waverail_common::peaks::{extract_peaks, PeakSet};
use waverail_common::time::seconds_to_samples;

use crate::audio::backend::{resolved_completion, Completion, Playout};
use crate::audio::AudioAsset;
use crate::error::{Error, Result};
use crate::playback::types::{InteractionMode, PlayoutOptions, ScheduleState};

/// Samples per synthesized fade envelope unless overridden
pub const FADE_CURVE_RESOLUTION: usize = 10000;

/// Which end of the audible region a fade shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeKind {
    FadeIn,
    FadeOut,
}

impl FadeKind {
    fn direction(&self) -> FadeDirection {
        match self {
            FadeKind::FadeIn => FadeDirection::In,
            FadeKind::FadeOut => FadeDirection::Out,
        }
    }
}

/// A stored gain envelope window, in seconds relative to the track's
/// audible region (`0 <= start < end <= duration`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub kind: FadeKind,
    pub shape: FadeShape,
    pub start: f64,
    pub end: f64,
}

impl Fade {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One audio source placed on the playlist timeline
pub struct Track {
    id: Uuid,
    src: String,
    asset: Arc<AudioAsset>,

    start_time: f64,
    end_time: f64,
    cue_in: f64,
    cue_out: f64,
    duration: f64,

    gain: f64,

    // Fade arena plus one "current id" slot per kind; setting a new fade
    // of a kind evicts the previous id from the arena first.
    fades: HashMap<Uuid, Fade>,
    fade_in: Option<Uuid>,
    fade_out: Option<Uuid>,

    peaks: Option<PeakSet>,
    peak_settings: PeakSettings,

    mode: InteractionMode,
    schedule_state: ScheduleState,
    fade_resolution: usize,

    playout: Box<dyn Playout>,
    offline_playout: Option<Box<dyn Playout>>,
}

impl Track {
    /// Create a track over `asset`, initially cueing the whole buffer at
    /// playlist position zero
    pub fn new(src: impl Into<String>, asset: Arc<AudioAsset>, playout: Box<dyn Playout>) -> Self {
        let duration = asset.duration();

        Self {
            id: Uuid::new_v4(),
            src: src.into(),
            asset,
            start_time: 0.0,
            end_time: duration,
            cue_in: 0.0,
            cue_out: duration,
            duration,
            gain: 1.0,
            fades: HashMap::new(),
            fade_in: None,
            fade_out: None,
            peaks: None,
            peak_settings: PeakSettings::default(),
            mode: InteractionMode::default(),
            schedule_state: ScheduleState::Idle,
            fade_resolution: FADE_CURVE_RESOLUTION,
            playout,
            offline_playout: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn asset(&self) -> &Arc<AudioAsset> {
        &self.asset
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn cue_in(&self) -> f64 {
        self.cue_in
    }

    pub fn cue_out(&self) -> f64 {
        self.cue_out
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn set_peak_settings(&mut self, settings: PeakSettings) {
        self.peak_settings = settings;
    }

    pub fn set_fade_resolution(&mut self, samples: usize) {
        self.fade_resolution = samples;
    }

    pub fn set_offline_playout(&mut self, playout: Box<dyn Playout>) {
        self.offline_playout = Some(playout);
    }

    /// Scheduling state, promoted to Playing while the backend renders
    pub fn schedule_state(&self) -> ScheduleState {
        if self.schedule_state == ScheduleState::Scheduled && self.playout.is_playing() {
            ScheduleState::Playing
        } else {
            self.schedule_state
        }
    }

    /// Move the track along the playlist timeline
    pub fn set_start_time(&mut self, start: f64) {
        self.start_time = start;
        self.end_time = start + self.duration;
    }

    /// Replace the cue range
    ///
    /// Validates before committing: on `InvalidCueRange` the previous cues
    /// (and everything derived from them) are untouched.
    pub fn set_cues(&mut self, cue_in: f64, cue_out: f64) -> Result<()> {
        if cue_out < cue_in {
            return Err(Error::InvalidCueRange { cue_in, cue_out });
        }

        self.cue_in = cue_in;
        self.cue_out = cue_out;
        self.duration = self.cue_out - self.cue_in;
        self.end_time = self.start_time + self.duration;

        Ok(())
    }

    /// Trim the audible region to `[start, end]` playlist seconds
    ///
    /// Applies only when the range overlaps the track; the new cues are the
    /// overlap clamped to the track, shifted by the existing offset between
    /// cue-in and track start. A range that misses the track entirely is a
    /// no-op.
    pub fn trim(&mut self, start: f64, end: f64) -> Result<()> {
        let track_start = self.start_time;
        let track_end = self.end_time;
        let offset = self.cue_in - track_start;

        if (track_start <= start && track_end >= start)
            || (track_start <= end && track_end >= end)
        {
            let cue_in = if start < track_start { track_start } else { start };
            let cue_out = if end > track_end { track_end } else { end };

            self.set_cues(cue_in + offset, cue_out + offset)?;
            if start > track_start {
                self.set_start_time(start);
            }
        }

        Ok(())
    }

    /// Per-track gain, pushed straight to the live playout
    pub fn set_gain_level(&mut self, level: f64) {
        self.gain = level;
        self.playout.set_volume_gain_level(level);
    }

    /// Playlist-wide gain; applied by the backend, never stored here
    pub fn set_master_gain_level(&mut self, level: f64) {
        self.playout.set_master_gain_level(level);
    }

    /// Mute/solo gate resolved by the transport
    pub fn set_should_play(&mut self, should_play: bool) {
        self.playout.set_should_play(should_play);
    }

    pub fn is_playing(&self) -> bool {
        self.playout.is_playing()
    }

    // ------------------------------- fades -------------------------------

    /// Fade the head of the audible region in over `duration` seconds
    pub fn set_fade_in(&mut self, duration: f64, shape: FadeShape) -> Result<()> {
        if duration > self.duration {
            return Err(Error::InvalidFadeDuration {
                requested: duration,
                duration: self.duration,
            });
        }

        if let Some(id) = self.fade_in.take() {
            self.remove_fade(id);
        }

        self.fade_in = Some(self.save_fade(FadeKind::FadeIn, shape, 0.0, duration));
        Ok(())
    }

    /// Fade the tail of the audible region out over `duration` seconds
    pub fn set_fade_out(&mut self, duration: f64, shape: FadeShape) -> Result<()> {
        if duration > self.duration {
            return Err(Error::InvalidFadeDuration {
                requested: duration,
                duration: self.duration,
            });
        }

        if let Some(id) = self.fade_out.take() {
            self.remove_fade(id);
        }

        self.fade_out = Some(self.save_fade(
            FadeKind::FadeOut,
            shape,
            self.duration - duration,
            self.duration,
        ));
        Ok(())
    }

    fn save_fade(&mut self, kind: FadeKind, shape: FadeShape, start: f64, end: f64) -> Uuid {
        let id = Uuid::new_v4();
        self.fades.insert(id, Fade { kind, shape, start, end });
        id
    }

    fn remove_fade(&mut self, id: Uuid) {
        self.fades.remove(&id);
    }

    /// Current fade-in window, if any
    pub fn fade_in_window(&self) -> Option<&Fade> {
        self.fade_in.and_then(|id| self.fades.get(&id))
    }

    /// Current fade-out window, if any
    pub fn fade_out_window(&self) -> Option<&Fade> {
        self.fade_out.and_then(|id| self.fades.get(&id))
    }

    // ------------------------------- peaks -------------------------------

    /// Recompute the peak representation of the current cue range
    ///
    /// Called after load and after every cue edit; the result is a pure
    /// function of buffer, cue range, resolution and width, so unchanged
    /// inputs reproduce the previous set exactly.
    pub fn calculate_peaks(&mut self, samples_per_pixel: usize, bits: u32) -> Result<()> {
        let rate = self.asset.sample_rate();
        let cue_in = seconds_to_samples(self.cue_in, rate);
        let cue_out = seconds_to_samples(self.cue_out, rate);

        self.peaks = Some(extract_peaks(
            &self.asset.channel_slices(),
            samples_per_pixel,
            self.peak_settings.mono,
            cue_in,
            cue_out,
            bits,
        )?);

        Ok(())
    }

    pub fn peaks(&self) -> Option<&PeakSet> {
        self.peaks.as_ref()
    }

    // ----------------------------- scheduling ----------------------------

    /// Schedule this track's contribution to a playback pass
    ///
    /// `start_time`/`end_time` are playlist seconds; an `end_time` bounds
    /// the pass to a segment. Returns the backend's completion signal for
    /// the pass, already resolved when the track has nothing to play in the
    /// requested window.
    pub fn schedule_play(
        &mut self,
        now: f64,
        start_time: f64,
        end_time: Option<f64>,
        options: &PlayoutOptions,
    ) -> Result<Completion> {
        let mut when = now;
        let mut segment = end_time.map(|end| end - start_time);

        if self.schedule_state == ScheduleState::Stopped {
            self.schedule_state = ScheduleState::Idle;
        }

        // 1) track has no content at or after the requested start
        // 2) a bounded request ends before this track begins
        if self.end_time <= start_time
            || segment.is_some_and(|seg| start_time + seg < self.start_time)
        {
            return Ok(resolved_completion());
        }

        let source_offset;
        let duration;

        if self.start_time >= start_time {
            // Track begins at or after the cursor: delay the source start.
            source_offset = 0.0;
            when += self.start_time - start_time;

            duration = match &mut segment {
                Some(seg) => {
                    *seg -= self.start_time - start_time;
                    seg.min(self.duration)
                }
                None => self.duration,
            };
        } else {
            // Cursor lands inside the track: skip into the source.
            source_offset = start_time - self.start_time;

            duration = match segment {
                Some(seg) => seg.min(self.duration - source_offset),
                None => self.duration - source_offset,
            };
        }

        let playout = if options.is_offline {
            self.offline_playout
                .as_mut()
                .ok_or(Error::MissingOfflinePlayout)?
        } else {
            &mut self.playout
        };

        let completion = playout.set_up_source();

        // Cursor position relative to this track; negative when the cursor
        // sits before the track's start.
        let rel_pos = start_time - self.start_time;

        for fade in self.fades.values() {
            // Fades entirely behind the cursor are inaudible this pass.
            if rel_pos >= fade.end {
                continue;
            }

            // An already-entered fade starts in the past so its envelope is
            // correctly mid-flight at `now`.
            let fade_start = if rel_pos <= fade.start {
                now + (fade.start - rel_pos)
            } else {
                now - (rel_pos - fade.start)
            };
            let curve = fade_curves::generate(fade.shape, self.fade_resolution, fade.kind.direction());

            match fade.kind {
                FadeKind::FadeIn => playout.apply_fade_in(fade_start, fade.duration(), &curve),
                FadeKind::FadeOut => playout.apply_fade_out(fade_start, fade.duration(), &curve),
            }
        }

        playout.set_volume_gain_level(self.gain);
        playout.set_should_play(options.should_play);
        playout.set_master_gain_level(options.master_gain);
        playout.play(when, source_offset + self.cue_in, duration);

        debug!(
            src = %self.src,
            when,
            offset = source_offset + self.cue_in,
            duration,
            "scheduled playout"
        );
        self.schedule_state = ScheduleState::Scheduled;

        Ok(completion)
    }

    /// Stop the scheduled pass `when` seconds from now
    ///
    /// Always legal; stopping an already-stopped track changes nothing.
    pub fn schedule_stop(&mut self, when: f64) {
        self.playout.stop(when);

        if matches!(
            self.schedule_state,
            ScheduleState::Scheduled | ScheduleState::Playing
        ) {
            self.schedule_state = ScheduleState::Stopped;
        }
    }

    // ------------------------------ details ------------------------------

    /// Serializable snapshot of this track's timing and fades
    pub fn details(&self) -> TrackDescriptor {
        TrackDescriptor {
            src: self.src.clone(),
            start: self.start_time,
            end: Some(self.end_time),
            cuein: self.cue_in,
            cueout: Some(self.cue_out),
            gain: self.gain,
            muted: false,
            soloed: false,
            selected: None,
            peaks: Some(self.peak_settings.clone()),
            fade_in: self.fade_in_window().map(|fade| FadeDescriptor {
                shape: fade.shape,
                duration: fade.duration(),
            }),
            fade_out: self.fade_out_window().map(|fade| FadeDescriptor {
                shape: fade.shape,
                duration: fade.duration(),
            }),
        }
    }

    /// Apply the mutable parts of a descriptor (cues, start, gain, fades)
    pub fn apply_descriptor(&mut self, descriptor: &TrackDescriptor) -> Result<()> {
        let cue_out = descriptor.cueout.unwrap_or_else(|| self.asset.duration());
        self.set_cues(descriptor.cuein, cue_out)?;
        self.set_start_time(descriptor.start);
        self.set_gain_level(descriptor.gain);

        if let Some(peaks) = &descriptor.peaks {
            self.peak_settings = peaks.clone();
        }

        if let Some(fade) = &descriptor.fade_in {
            self.set_fade_in(fade.duration, fade.shape)?;
        }
        if let Some(fade) = &descriptor.fade_out {
            self.set_fade_out(fade.duration, fade.shape)?;
        }

        if descriptor.cueout.is_some() && cue_out > self.asset.duration() {
            warn!(
                src = %self.src,
                cue_out,
                buffer = self.asset.duration(),
                "cue out extends past the decoded buffer"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Backend stub recording every command it receives
    #[derive(Default)]
    struct RecordingPlayout {
        calls: Arc<Mutex<Vec<String>>>,
        playing: Arc<AtomicBool>,
    }

    impl RecordingPlayout {
        fn with_log() -> (Box<dyn Playout>, Arc<Mutex<Vec<String>>>, Arc<AtomicBool>) {
            let playout = RecordingPlayout::default();
            let calls = Arc::clone(&playout.calls);
            let playing = Arc::clone(&playout.playing);
            (Box::new(playout), calls, playing)
        }
    }

    impl Playout for RecordingPlayout {
        fn set_up_source(&mut self) -> Completion {
            self.calls.lock().unwrap().push("setup".to_string());
            resolved_completion()
        }

        fn play(&mut self, when: f64, offset: f64, duration: f64) {
            self.playing.store(true, Ordering::SeqCst);
            self.calls
                .lock()
                .unwrap()
                .push(format!("play({when},{offset},{duration})"));
        }

        fn stop(&mut self, when: f64) {
            self.playing.store(false, Ordering::SeqCst);
            self.calls.lock().unwrap().push(format!("stop({when})"));
        }

        fn set_volume_gain_level(&mut self, level: f64) {
            self.calls.lock().unwrap().push(format!("gain({level})"));
        }

        fn set_master_gain_level(&mut self, level: f64) {
            self.calls.lock().unwrap().push(format!("master({level})"));
        }

        fn set_should_play(&mut self, should_play: bool) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("should_play({should_play})"));
        }

        fn apply_fade_in(&mut self, start: f64, duration: f64, curve: &[f32]) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("fade_in({start},{duration},len={})", curve.len()));
        }

        fn apply_fade_out(&mut self, start: f64, duration: f64, curve: &[f32]) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("fade_out({start},{duration},len={})", curve.len()));
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
    }

    fn ten_second_track() -> (Track, Arc<Mutex<Vec<String>>>) {
        let (playout, calls, _) = RecordingPlayout::with_log();
        let asset = AudioAsset::silence(10.0, 44100, 1);
        let track = Track::new("clip.wav", asset, playout);
        (track, calls)
    }

    #[test]
    fn test_new_track_spans_buffer() {
        let (track, _) = ten_second_track();

        assert_eq!(track.start_time(), 0.0);
        assert_eq!(track.duration(), 10.0);
        assert_eq!(track.end_time(), 10.0);
        assert_eq!(track.cue_out(), 10.0);
    }

    #[test]
    fn test_set_cues_recomputes_derived_times() {
        let (mut track, _) = ten_second_track();
        track.set_start_time(2.0);
        track.set_cues(1.0, 6.0).unwrap();

        assert_eq!(track.duration(), 5.0);
        assert_eq!(track.end_time(), 7.0);
    }

    #[test]
    fn test_invalid_cue_range_leaves_state_intact() {
        let (mut track, _) = ten_second_track();
        track.set_cues(1.0, 6.0).unwrap();

        let result = track.set_cues(5.0, 2.0);
        assert!(matches!(result, Err(Error::InvalidCueRange { .. })));

        assert_eq!(track.cue_in(), 1.0);
        assert_eq!(track.cue_out(), 6.0);
        assert_eq!(track.duration(), 5.0);
    }

    #[test]
    fn test_schedule_play_inside_track() {
        let (mut track, calls) = ten_second_track();

        track
            .schedule_play(0.0, 2.0, None, &PlayoutOptions::default())
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"play(0,2,8)".to_string()));
    }

    #[test]
    fn test_schedule_play_before_track_delays_start() {
        let (mut track, calls) = ten_second_track();

        track
            .schedule_play(0.0, -3.0, None, &PlayoutOptions::default())
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"play(3,0,10)".to_string()));
    }

    #[test]
    fn test_schedule_play_past_end_is_noop() {
        let (mut track, calls) = ten_second_track();

        track
            .schedule_play(0.0, 10.0, None, &PlayoutOptions::default())
            .unwrap();
        track
            .schedule_play(0.0, 25.0, Some(30.0), &PlayoutOptions::default())
            .unwrap();

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(track.schedule_state(), ScheduleState::Idle);
    }

    #[test]
    fn test_schedule_play_segment_ending_before_track_is_noop() {
        let (mut track, calls) = ten_second_track();
        track.set_start_time(20.0);

        track
            .schedule_play(0.0, 5.0, Some(8.0), &PlayoutOptions::default())
            .unwrap();

        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bounded_segment_clamps_duration() {
        let (mut track, calls) = ten_second_track();

        track
            .schedule_play(0.0, 2.0, Some(5.0), &PlayoutOptions::default())
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"play(0,2,3)".to_string()));
    }

    #[test]
    fn test_cue_in_added_to_source_offset() {
        let (mut track, calls) = ten_second_track();
        track.set_cues(1.5, 9.5).unwrap();

        track
            .schedule_play(0.0, 2.0, None, &PlayoutOptions::default())
            .unwrap();

        // offset = (2.0 - start 0.0) + cue_in 1.5, duration = 8 - 2
        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"play(0,3.5,6)".to_string()));
    }

    #[test]
    fn test_fade_windows() {
        let (mut track, _) = ten_second_track();
        track.set_fade_out(3.0, FadeShape::Linear).unwrap();

        let fade = track.fade_out_window().unwrap();
        assert_eq!(fade.start, 7.0);
        assert_eq!(fade.end, 10.0);
        assert_eq!(fade.duration(), 3.0);
    }

    #[test]
    fn test_fade_longer_than_track_rejected() {
        let (mut track, _) = ten_second_track();
        let result = track.set_fade_in(11.0, FadeShape::Linear);

        assert!(matches!(result, Err(Error::InvalidFadeDuration { .. })));
        assert!(track.fade_in_window().is_none());
    }

    #[test]
    fn test_new_fade_evicts_previous_of_same_kind() {
        let (mut track, _) = ten_second_track();
        track.set_fade_in(2.0, FadeShape::Linear).unwrap();
        track.set_fade_in(4.0, FadeShape::SCurve).unwrap();

        assert_eq!(track.fades.len(), 1);
        let fade = track.fade_in_window().unwrap();
        assert_eq!(fade.end, 4.0);
        assert_eq!(fade.shape, FadeShape::SCurve);
    }

    #[test]
    fn test_fades_of_both_kinds_coexist() {
        let (mut track, _) = ten_second_track();
        track.set_fade_in(2.0, FadeShape::Linear).unwrap();
        track.set_fade_out(3.0, FadeShape::Linear).unwrap();

        assert_eq!(track.fades.len(), 2);
    }

    #[test]
    fn test_fade_behind_cursor_not_applied() {
        let (mut track, calls) = ten_second_track();
        track.set_fade_in(2.0, FadeShape::Linear).unwrap();

        // Cursor at 5s: the 0..2s fade-in already finished.
        track
            .schedule_play(0.0, 5.0, None, &PlayoutOptions::default())
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c.starts_with("fade_in")));
    }

    #[test]
    fn test_fade_ahead_of_cursor_scheduled_in_future() {
        let (mut track, calls) = ten_second_track();
        track.set_fade_resolution(100);
        track.set_fade_out(2.0, FadeShape::Linear).unwrap();

        track
            .schedule_play(1.0, 0.0, None, &PlayoutOptions::default())
            .unwrap();

        // Fade-out window is 8..10s; with now=1 and rel_pos=0 it begins at
        // clock time 9.
        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"fade_out(9,2,len=100)".to_string()));
    }

    #[test]
    fn test_entered_fade_starts_in_the_past() {
        let (mut track, calls) = ten_second_track();
        track.set_fade_resolution(100);
        track.set_fade_in(4.0, FadeShape::Linear).unwrap();

        // Cursor at 1s sits one second into the 0..4s fade-in.
        track
            .schedule_play(5.0, 1.0, None, &PlayoutOptions::default())
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"fade_in(4,4,len=100)".to_string()));
    }

    #[test]
    fn test_schedule_stop_idempotent() {
        let (mut track, _) = ten_second_track();
        track
            .schedule_play(0.0, 0.0, None, &PlayoutOptions::default())
            .unwrap();

        track.schedule_stop(0.0);
        let state_once = track.schedule_state();
        track.schedule_stop(0.0);

        assert_eq!(state_once, ScheduleState::Stopped);
        assert_eq!(track.schedule_state(), ScheduleState::Stopped);
    }

    #[test]
    fn test_stopped_resets_to_idle_on_next_schedule() {
        let (mut track, _) = ten_second_track();
        track
            .schedule_play(0.0, 0.0, None, &PlayoutOptions::default())
            .unwrap();
        track.schedule_stop(0.0);

        track
            .schedule_play(0.0, 0.0, None, &PlayoutOptions::default())
            .unwrap();
        assert_eq!(track.schedule_state(), ScheduleState::Playing);
    }

    #[test]
    fn test_trim_clamps_to_overlap() {
        let (mut track, _) = ten_second_track();
        track.trim(2.0, 15.0).unwrap();

        assert_eq!(track.start_time(), 2.0);
        assert_eq!(track.cue_in(), 2.0);
        assert_eq!(track.cue_out(), 10.0);
        assert_eq!(track.end_time(), 10.0);
    }

    #[test]
    fn test_trim_preserves_cue_offset() {
        let (mut track, _) = ten_second_track();
        track.set_cues(1.0, 9.0).unwrap();
        track.set_start_time(4.0);
        // Track occupies 4..12 on the playlist with cue offset -3.

        track.trim(6.0, 20.0).unwrap();

        assert_eq!(track.start_time(), 6.0);
        assert_eq!(track.cue_in(), 3.0);
        assert_eq!(track.cue_out(), 9.0);
    }

    #[test]
    fn test_trim_outside_track_is_noop() {
        let (mut track, _) = ten_second_track();
        track.trim(12.0, 20.0).unwrap();

        assert_eq!(track.start_time(), 0.0);
        assert_eq!(track.cue_in(), 0.0);
        assert_eq!(track.cue_out(), 10.0);
    }

    #[test]
    fn test_details_reports_fades_as_durations() {
        let (mut track, _) = ten_second_track();
        track.set_fade_in(2.0, FadeShape::SCurve).unwrap();
        track.set_fade_out(3.0, FadeShape::Linear).unwrap();

        let details = track.details();
        assert_eq!(details.start, 0.0);
        assert_eq!(details.end, Some(10.0));
        assert_eq!(details.fade_in.unwrap().duration, 2.0);
        assert_eq!(details.fade_out.unwrap().shape, FadeShape::Linear);
    }

    #[test]
    fn test_calculate_peaks_respects_cues() {
        let (mut track, _) = ten_second_track();
        track.set_cues(0.0, 5.0).unwrap();
        track.calculate_peaks(4410, 8).unwrap();

        // 5s at 44100 Hz over 4410-sample windows is 50 peaks.
        assert_eq!(track.peaks().unwrap().length, 50);
    }

    #[test]
    fn test_offline_schedule_without_handle_fails() {
        let (mut track, _) = ten_second_track();
        let options = PlayoutOptions {
            is_offline: true,
            ..Default::default()
        };

        let result = track.schedule_play(0.0, 0.0, None, &options);
        assert!(matches!(result, Err(Error::MissingOfflinePlayout)));
    }

    #[test]
    fn test_offline_schedule_uses_offline_handle() {
        let (mut track, live_calls) = ten_second_track();
        let (offline, offline_calls, _) = RecordingPlayout::with_log();
        track.set_offline_playout(offline);

        let options = PlayoutOptions {
            is_offline: true,
            ..Default::default()
        };
        track.schedule_play(0.0, 0.0, None, &options).unwrap();

        assert!(live_calls.lock().unwrap().is_empty());
        assert!(offline_calls
            .lock()
            .unwrap()
            .contains(&"play(0,0,10)".to_string()));
    }
}
