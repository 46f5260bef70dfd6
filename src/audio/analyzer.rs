//! Spectrum and level extraction from the mixed output.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::params::AnalysisConfig;
use crate::signal::map_range;

/// Analyzer collaborator: one spectrum and one level per frame, never failing
pub trait Analyzer {
    /// Byte-scaled spectrum (0-255 per bin) for the latest samples
    fn analyze(&mut self) -> &[f32];

    /// RMS amplitude of the latest samples [0, 1]
    fn level(&self) -> f32;
}

/// Windowed FFT analyzer with temporal smoothing and decibel scaling
pub struct FftAnalyzer {
    config: AnalysisConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    history: VecDeque<f32>,
    capacity: usize,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    spectrum: Vec<f32>,
}

impl FftAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| hann_window(i, config.fft_size))
            .collect();
        let bins = config.spectrum_bins();
        let capacity = config.fft_size.max(config.level_window);

        Self {
            fft,
            window,
            history: VecDeque::with_capacity(capacity),
            capacity,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; bins],
            spectrum: vec![0.0; bins],
            config,
        }
    }

    /// Append freshly rendered samples, keeping only the newest window
    pub fn push_samples(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(self.capacity);
        for &sample in &samples[skip..] {
            if self.history.len() == self.capacity {
                self.history.pop_front();
            }
            self.history
                .push_back(if sample.is_finite() { sample } else { 0.0 });
        }
    }

    /// Latest spectrum without recomputing
    pub fn spectrum(&self) -> &[f32] {
        &self.spectrum
    }
}

impl Analyzer for FftAnalyzer {
    fn analyze(&mut self) -> &[f32] {
        let size = self.config.fft_size;
        // Zero-pad at the front until enough samples have arrived
        let missing = size.saturating_sub(self.history.len());
        let newest = self.history.iter().skip(self.history.len().saturating_sub(size));

        for slot in &mut self.buffer[..missing] {
            *slot = Complex::new(0.0, 0.0);
        }
        for ((slot, &sample), &w) in self.buffer[missing..]
            .iter_mut()
            .zip(newest)
            .zip(&self.window[missing..])
        {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut self.buffer);

        let smoothing = self.config.smoothing;
        let norm = 1.0 / size as f32;
        for (k, value) in self.spectrum.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * norm;
            let smoothed = smoothing * self.smoothed[k] + (1.0 - smoothing) * magnitude;
            self.smoothed[k] = smoothed;

            let db = if smoothed > 0.0 {
                20.0 * smoothed.log10()
            } else {
                f32::NEG_INFINITY
            };
            *value = if db.is_finite() {
                map_range(db, self.config.min_db, self.config.max_db, 0.0, 255.0).floor()
            } else {
                0.0
            };
        }

        &self.spectrum
    }

    fn level(&self) -> f32 {
        let window = self.config.level_window.min(self.history.len());
        if window == 0 {
            return 0.0;
        }
        let sum: f32 = self
            .history
            .iter()
            .skip(self.history.len() - window)
            .map(|s| s * s)
            .sum();
        (sum / window as f32).sqrt().clamp(0.0, 1.0)
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq_hz: f32, amplitude: f32, len: usize, sample_rate: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 512;
        assert!(hann_window(0, size).abs() < 0.01);
        assert!(hann_window(size - 1, size).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_and_empty_history() {
        let mut analyzer = FftAnalyzer::new(AnalysisConfig::default());
        assert_eq!(analyzer.level(), 0.0);
        assert!(analyzer.analyze().iter().all(|&v| v == 0.0));
        assert_eq!(analyzer.spectrum().len(), 256);

        analyzer.push_samples(&[0.0; 2048]);
        assert_eq!(analyzer.level(), 0.0);
        assert!(analyzer.analyze().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tone_lands_in_bass_band() {
        let config = AnalysisConfig {
            smoothing: 0.0,
            ..AnalysisConfig::default()
        };
        let sample_rate = config.sample_rate_hz as f32;
        // Bin 10 of a 512-point FFT
        let freq = 10.0 * config.bin_hz();
        let mut analyzer = FftAnalyzer::new(config);
        analyzer.push_samples(&tone(freq, 0.5, 2048, sample_rate));

        let spectrum = analyzer.analyze().to_vec();
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((9..=11).contains(&peak), "peak at bin {peak}");
        assert!(spectrum[peak] > 200.0);
        assert!(spectrum[200] < spectrum[peak]);
    }

    #[test]
    fn test_level_is_rms() {
        let mut analyzer = FftAnalyzer::new(AnalysisConfig::default());
        analyzer.push_samples(&[0.5; 4096]);
        assert!((analyzer.level() - 0.5).abs() < 1e-5);

        analyzer.push_samples(&[f32::NAN; 1024]);
        assert_eq!(analyzer.level(), 0.0);
    }

    #[test]
    fn test_smoothing_relaxes_gradually() {
        let config = AnalysisConfig::default();
        let sample_rate = config.sample_rate_hz as f32;
        let freq = 20.0 * config.bin_hz();
        let mut analyzer = FftAnalyzer::new(config);

        analyzer.push_samples(&tone(freq, 0.5, 1024, sample_rate));
        let loud = analyzer.analyze()[20];
        analyzer.push_samples(&[0.0; 1024]);
        let after = analyzer.analyze()[20];

        assert!(after > 0.0 && after < loud);
    }
}
