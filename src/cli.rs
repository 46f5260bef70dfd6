//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::error::Result;
use crate::params::{Config, RecordingConfig, TextStrategy};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lowtide")]
#[command(about = "Audio-reactive tide: flow-field particles, sediment bands and whispered field notes", long_about = None)]
pub struct Args {
    /// TOML file overriding any subset of the defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Render offline to PNG frames + WAV (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// River bed audio (WAV); synthesized when omitted
    #[arg(long, value_name = "WAV")]
    pub river: Option<PathBuf>,

    /// Ocean bed audio (WAV); synthesized when omitted
    #[arg(long, value_name = "WAV")]
    pub ocean: Option<PathBuf>,

    /// Field notes corpus, one line per note
    #[arg(long, value_name = "TXT")]
    pub notes: Option<PathBuf>,

    /// Overlay text strategy (overrides the config file)
    #[arg(long, value_enum)]
    pub strategy: Option<TextStrategy>,

    /// Seed for every random draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window or frame width (pixels)
    #[arg(long)]
    pub width: Option<u32>,

    /// Window or frame height (pixels)
    #[arg(long)]
    pub height: Option<u32>,
}

impl Args {
    /// Defaults, then the config file, then command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Config: {}", path.display());
                Config::load(path)?
            }
            None => Config::default(),
        };

        if let Some(strategy) = self.strategy {
            config.overlay.strategy = strategy;
        }
        if let Some(width) = self.width {
            config.render.window_width = width.max(1);
        }
        if let Some(height) = self.height {
            config.render.window_height = height.max(1);
        }
        Ok(config)
    }

    /// Corpus lines; a missing file degrades to an empty corpus
    pub fn load_notes(&self) -> Vec<String> {
        let Some(path) = &self.notes else {
            return Vec::new();
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let lines: Vec<String> = text.lines().map(str::to_string).collect();
                info!("Loaded {} note lines from {}", lines.len(), path.display());
                lines
            }
            Err(e) => {
                warn!("Could not read notes {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Create recording configuration (and its directories) if recording
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);
        std::fs::create_dir_all(config.frames_dir())?;
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Some(config))
    }
}
