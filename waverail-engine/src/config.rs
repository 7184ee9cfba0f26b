//! Engine configuration
//!
//! Built-in defaults live in code; a TOML bootstrap file may override them
//! at startup. Nothing here changes at runtime — runtime-adjustable values
//! (master gain, fade shape, exclusive solo) move onto the transport once
//! it is constructed and are only seeded from this struct.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use waverail_common::fade_curves::FadeShape;

use crate::error::{Error, Result};

fn default_samples_per_pixel() -> usize {
    4096
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_mono() -> bool {
    true
}

fn default_peak_bits() -> u32 {
    8
}

fn default_fade_shape() -> FadeShape {
    FadeShape::Logarithmic
}

fn default_fade_curve_resolution() -> usize {
    10000
}

fn default_master_gain() -> f64 {
    1.0
}

fn default_tick_interval_ms() -> u64 {
    // One display frame at 60 Hz; the update loop must not outpace the
    // host's refresh rate.
    16
}

fn default_event_capacity() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (stderr when unset)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Engine configuration with built-in defaults
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Waveform decimation window for peak extraction
    #[serde(default = "default_samples_per_pixel")]
    pub samples_per_pixel: usize,

    /// Nominal timeline sample rate for pixel conversions
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Fold multi-channel peaks into one waveform
    #[serde(default = "default_mono")]
    pub mono: bool,

    /// Peak quantization width (8, 16 or 32)
    #[serde(default = "default_peak_bits")]
    pub peak_bits: u32,

    /// Shape applied by subsequent fade edits until changed
    #[serde(default = "default_fade_shape")]
    pub fade_shape: FadeShape,

    /// Samples per synthesized fade envelope
    #[serde(default = "default_fade_curve_resolution")]
    pub fade_curve_resolution: usize,

    /// Initial playlist-wide gain
    #[serde(default = "default_master_gain")]
    pub master_gain: f64,

    /// Solo replaces the soloed set instead of accumulating
    #[serde(default)]
    pub exclusive_solo: bool,

    /// Update-loop tick period in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Event bus buffer size per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        // Round-trip through serde so the defaults exist in exactly one
        // place (the default_* functions above).
        toml::from_str("").expect("empty config deserializes from defaults")
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
