//! Signal aggregation: spectrum + level in, bounded visual parameters out.
//!
//! `aggregate` reduces a spectrum to three bands, `map_parameters` turns the
//! result into everything the particle field, the tide bands and the overlay
//! read for the frame. Both are pure; the only state on this path is the
//! transport gain `Smoother`.

mod mapper;
mod smooth;

pub use mapper::{map_parameters, map_range, Clock, VisualParameters};
pub use smooth::Smoother;

use std::ops::Range;

use crate::params::AnalysisConfig;

/// Per-frame audio aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalFrame {
    /// Amplitude level [0, 1]
    pub amplitude: f32,
    /// Mean bass magnitude [0, 255]
    pub bass: f32,
    /// Mean mid magnitude [0, 255]
    pub mid: f32,
    /// Mean high magnitude [0, 255]
    pub high: f32,
}

/// Bin boundaries between bass, mid and high
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSplit {
    pub bass_end: usize,
    pub mid_end: usize,
}

impl Default for BandSplit {
    fn default() -> Self {
        Self {
            bass_end: 30,
            mid_end: 120,
        }
    }
}

impl From<&AnalysisConfig> for BandSplit {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            bass_end: config.bass_bins().end,
            mid_end: config.mid_bins().end,
        }
    }
}

/// Reduce a spectrum and amplitude level to a `SignalFrame`
///
/// Short or empty spectra are fine: a band with no bins averages to 0.
/// Non-finite or negative magnitudes count as 0 and band means are clamped
/// to [0, 255].
pub fn aggregate(spectrum: &[f32], level: f32, split: BandSplit) -> SignalFrame {
    let len = spectrum.len();
    let bass_end = split.bass_end.min(len);
    let mid_end = split.mid_end.max(split.bass_end).min(len);

    SignalFrame {
        amplitude: sanitize(level).min(1.0),
        bass: band_mean(spectrum, 0..bass_end),
        mid: band_mean(spectrum, bass_end..mid_end),
        high: band_mean(spectrum, mid_end..len),
    }
}

fn band_mean(spectrum: &[f32], bins: Range<usize>) -> f32 {
    let slice = &spectrum[bins];
    if slice.is_empty() {
        return 0.0;
    }
    let sum: f32 = slice.iter().map(|&v| sanitize(v)).sum();
    (sum / slice.len() as f32).min(255.0)
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_follows_analysis_bins() {
        let config = AnalysisConfig {
            bass_end_bin: 12,
            mid_end_bin: 80,
            ..AnalysisConfig::default()
        };
        let split = BandSplit::from(&config);
        assert_eq!(0..split.bass_end, config.bass_bins());
        assert_eq!(split.bass_end..split.mid_end, config.mid_bins());

        let mut spectrum = vec![0.0; 256];
        spectrum[..12].fill(50.0);
        spectrum[12..80].fill(20.0);
        let frame = aggregate(&spectrum, 0.0, split);
        assert_eq!(frame.bass, 50.0);
        assert_eq!(frame.mid, 20.0);
        assert_eq!(frame.high, 0.0);
    }

    #[test]
    fn test_empty_spectrum_zeroes_bands() {
        let frame = aggregate(&[], 0.25, BandSplit::default());
        assert_eq!(frame.bass, 0.0);
        assert_eq!(frame.mid, 0.0);
        assert_eq!(frame.high, 0.0);
        assert_eq!(frame.amplitude, 0.25);
    }

    #[test]
    fn test_band_means() {
        let mut spectrum = vec![0.0; 256];
        spectrum[..30].fill(90.0);
        spectrum[30..120].fill(30.0);
        spectrum[120..].fill(12.0);

        let frame = aggregate(&spectrum, 0.1, BandSplit::default());
        assert_eq!(frame.bass, 90.0);
        assert_eq!(frame.mid, 30.0);
        assert_eq!(frame.high, 12.0);
    }

    #[test]
    fn test_short_spectrum_degrades() {
        let frame = aggregate(&[10.0, 20.0], 0.0, BandSplit::default());
        assert_eq!(frame.bass, 15.0);
        assert_eq!(frame.mid, 0.0);
        assert_eq!(frame.high, 0.0);
    }

    #[test]
    fn test_bad_values_are_sanitized() {
        let spectrum = [f32::NAN, -40.0, f32::INFINITY, 1000.0];
        let frame = aggregate(&spectrum, f32::NAN, BandSplit { bass_end: 3, mid_end: 3 });
        assert_eq!(frame.bass, 0.0);
        assert_eq!(frame.mid, 0.0);
        assert_eq!(frame.high, 255.0);
        assert_eq!(frame.amplitude, 0.0);
    }
}
