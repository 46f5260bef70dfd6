//! Audio analysis configuration and constants.

use std::ops::Range;

use serde::Deserialize;

/// Spectrum analysis configuration with frequency band split points
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Audio sample rate (Hz) used when no output device dictates one
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2, yields fft_size / 2 spectrum bins)
    pub fft_size: usize,

    /// Temporal smoothing between successive spectra (0 = none, must be < 1)
    pub smoothing: f32,

    /// Magnitude mapped to spectrum value 0 (decibels)
    pub min_db: f32,

    /// Magnitude mapped to spectrum value 255 (decibels)
    pub max_db: f32,

    /// Samples used for the RMS amplitude level
    pub level_window: usize,

    /// First bin of the mid band (bass = [0, bass_end_bin))
    pub bass_end_bin: usize,

    /// First bin of the high band (mid = [bass_end_bin, mid_end_bin))
    pub mid_end_bin: usize,

    /// Length of each synthesized bed loop when no WAV file is given (seconds)
    pub synth_loop_secs: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 512,
            smoothing: 0.9,
            min_db: -100.0,
            max_db: -30.0,
            level_window: 1024,
            bass_end_bin: 30,
            mid_end_bin: 120,
            synth_loop_secs: 20.0,
        }
    }
}

impl AnalysisConfig {
    /// Number of spectrum bins produced per analysis frame
    pub fn spectrum_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Width of one spectrum bin (Hz)
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Spectrum bin range for bass
    pub fn bass_bins(&self) -> Range<usize> {
        0..self.bass_end_bin
    }

    /// Spectrum bin range for mids
    pub fn mid_bins(&self) -> Range<usize> {
        self.bass_end_bin..self.mid_end_bin
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(format!("Smoothing must be in [0, 1), got {}", self.smoothing));
        }
        if self.min_db >= self.max_db {
            return Err("min_db must be below max_db".to_string());
        }
        if self.bass_end_bin > self.mid_end_bin {
            return Err("bass_end_bin must not exceed mid_end_bin".to_string());
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    pub const BLOCK_SIZE: usize = 128;
}
