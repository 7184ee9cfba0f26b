//! Track descriptor inspector
//!
//! Loads a JSON array of track descriptors into an in-memory playlist
//! (buffers synthesized as silence) and dumps the normalized track details
//! back out as pretty JSON. Useful for checking how start/cue/fade values
//! survive validation without involving a real decoder or backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waverail_common::descriptor::TrackDescriptor;
use waverail_engine::audio::backend::{resolved_completion, AudioClock, Completion, Playout};
use waverail_engine::loader::MemoryLoader;
use waverail_engine::playback::TrackLoad;
use waverail_engine::{EngineConfig, TransportController};

/// Command-line arguments for dump-tracks
#[derive(Parser, Debug)]
#[command(name = "dump-tracks")]
#[command(about = "Inspect normalized track descriptors for a Waverail playlist")]
#[command(version)]
struct Args {
    /// JSON file containing an array of track descriptors
    descriptors: PathBuf,

    /// Optional engine configuration TOML
    #[arg(short, long, env = "WAVERAIL_CONFIG")]
    config: Option<PathBuf>,

    /// Buffer length in seconds for descriptors without a cue out
    #[arg(short, long, default_value = "30.0")]
    duration: f64,

    /// Sample rate of the synthesized buffers
    #[arg(short, long, default_value = "44100")]
    sample_rate: u32,
}

/// Playout stub: accepts every command, renders nothing
struct NullPlayout;

impl Playout for NullPlayout {
    fn set_up_source(&mut self) -> Completion {
        resolved_completion()
    }

    fn play(&mut self, _when: f64, _offset: f64, _duration: f64) {}

    fn stop(&mut self, _when: f64) {}

    fn set_volume_gain_level(&mut self, _level: f64) {}

    fn set_master_gain_level(&mut self, _level: f64) {}

    fn set_should_play(&mut self, _should_play: bool) {}

    fn apply_fade_in(&mut self, _start: f64, _duration: f64, _curve: &[f32]) {}

    fn apply_fade_out(&mut self, _start: f64, _duration: f64, _curve: &[f32]) {}

    fn is_playing(&self) -> bool {
        false
    }
}

/// Wall-clock stand-in for the audio clock
struct SystemClock(Instant);

impl AudioClock for SystemClock {
    fn current_time(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waverail_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let contents = std::fs::read_to_string(&args.descriptors)
        .with_context(|| format!("Failed to read {}", args.descriptors.display()))?;
    let descriptors: Vec<TrackDescriptor> =
        serde_json::from_str(&contents).context("Failed to parse track descriptors")?;

    let transport = TransportController::new(Arc::new(SystemClock(Instant::now())), config);

    let requests = descriptors
        .into_iter()
        .map(|descriptor| {
            let seconds = descriptor.cueout.unwrap_or(args.duration).max(args.duration);
            let frames = (seconds * args.sample_rate as f64) as usize;

            TrackLoad {
                loader: Box::new(MemoryLoader::new(
                    descriptor.src.clone(),
                    vec![vec![0.0; frames]],
                    args.sample_rate,
                    transport.events(),
                )),
                playout: Box::new(NullPlayout),
                descriptor,
            }
        })
        .collect();

    let ids = transport
        .load(requests)
        .await
        .context("Failed to build playlist")?;

    let info = transport.get_info().await;
    println!("{}", serde_json::to_string_pretty(&info)?);

    let duration = transport.duration().await;
    tracing::info!(tracks = ids.len(), duration, "playlist inspected");
    Ok(())
}
