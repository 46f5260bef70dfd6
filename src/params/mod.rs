//! Parameter definitions with units and documented semantics.
//!
//! Every tunable lives here with:
//! - Units (pixels, frames, milliseconds, 0-255 alpha, etc.)
//! - Documented ranges and meanings
//! - A `Default` that reproduces the installation's tuning
//!
//! A TOML file only needs to name the values it overrides.

mod audio;
mod flow;
mod mapping;
mod overlay;
mod render;
mod session;
mod tide;

use std::path::Path;

use serde::Deserialize;

use crate::error::{LowtideError, Result};

// Re-export all types
pub use audio::{audio_constants, AnalysisConfig};
pub use flow::FlowParams;
pub use mapping::MappingParams;
pub use overlay::{OverlayParams, RippleParams, TextStrategy, TriggerPolicy, VoiceSettings};
pub use render::{RecordingConfig, RenderConfig};
pub use session::SessionParams;
pub use tide::{BandParams, SEDIMENT_PALETTE};

/// Complete configuration for one installation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub mapping: MappingParams,
    pub flow: FlowParams,
    pub bands: BandParams,
    pub overlay: OverlayParams,
    pub session: SessionParams,
    pub render: RenderConfig,
}

impl Config {
    /// Load a (possibly partial) TOML config and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no frame could work with
    pub fn validate(&self) -> Result<()> {
        self.analysis
            .validate()
            .and_then(|_| self.mapping.validate())
            .and_then(|_| self.flow.validate())
            .and_then(|_| self.bands.validate())
            .and_then(|_| self.overlay.validate())
            .map_err(LowtideError::InvalidConfig)
    }
}
