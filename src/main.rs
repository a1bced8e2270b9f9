mod controller;
mod engine;
mod ops;
mod types;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gstreamer as gst;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::controller::AudioController;
use crate::engine::gst_engine::GstEngineFactory;
use crate::types::config::AudioConfig;
use crate::ui::app::NeuralAudioApp;

#[derive(Debug, Parser)]
#[command(name = "neural-audio", about = "Cyberpunk puzzle audio player")]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Track locator, repeat to build the playlist (replaces the configured tracks)
    #[arg(long = "track")]
    tracks: Vec<String>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<AudioConfig> {
        let mut config = match &self.config {
            Some(path) => AudioConfig::load_from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AudioConfig::default(),
        };
        if !self.tracks.is_empty() {
            config.audio_files = self.tracks.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    info!(tracks = config.audio_files.len(), "starting neural audio");

    gst::init().context("failed to initialize GStreamer")?;

    let controller = AudioController::mount(
        config.playlist(),
        GstEngineFactory,
        config.poll_interval(),
    );
    let app = NeuralAudioApp::new(controller, config.class_name.clone());

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Neural Audio System",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("ui exited with an error: {}", err))?;
    Ok(())
}
