//! Pure mapping from aggregated signals to bounded visual parameters.

use super::SignalFrame;
use crate::params::MappingParams;

/// Monotonic frame clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    /// Frames since the loop started
    pub frame: u64,
    /// Milliseconds since the loop started
    pub elapsed_ms: f64,
}

impl Clock {
    pub fn new(frame: u64, elapsed_ms: f64) -> Self {
        Self { frame, elapsed_ms }
    }
}

/// Per-frame derived parameters, every field inside its documented bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParameters {
    /// Text/ripple color blend [0, 1]
    pub hue_drift: f32,
    /// Ribbon wave amplitude, within `MappingParams::wave_amplitude`
    pub wave_amplitude: f32,
    /// Band vertical drift amplitude [0, vertical_drift_max]
    pub vertical_drift: f32,
    /// Extra band rotation from mids [0, 255 * tilt_per_mid]
    pub tilt: f32,
    /// Band alpha multiplier, within `MappingParams::band_alpha`
    pub band_alpha: f32,
    /// Particle population target [min_count, max_count]
    pub target_particle_count: usize,
    /// Flow vector magnitude [base_flow, base_flow + flow_gain]
    pub flow_strength: f32,
    /// Unsmoothed transport gain, within `MappingParams::gain`
    pub gain: f32,
    /// Particle alpha (0-255), within `MappingParams::particle_alpha`
    pub particle_alpha: f32,
}

/// Linear map of `value` from [in_lo, in_hi] to [out_lo, out_hi], clamped
/// to the output range.
///
/// A degenerate input range (or a NaN value) yields `out_lo`. The output
/// range may be decreasing.
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let span = in_hi - in_lo;
    if span == 0.0 || !span.is_finite() || value.is_nan() {
        return out_lo;
    }
    let mapped = out_lo + (value - in_lo) / span * (out_hi - out_lo);
    if out_lo <= out_hi {
        mapped.clamp(out_lo, out_hi)
    } else {
        mapped.clamp(out_hi, out_lo)
    }
}

/// Translate one frame of signal into visual parameters
pub fn map_parameters(
    signal: &SignalFrame,
    clock: Clock,
    params: &MappingParams,
) -> VisualParameters {
    let level = signal.amplitude;
    let ceiling = params.level_ceiling;

    let oscillation = (((clock.elapsed_ms * params.hue_rate).sin() + 1.0) * 0.5) as f32;
    let boost = map_range(level, 0.0, ceiling, 0.0, params.hue_boost_max);
    let hue_drift = (oscillation + boost).clamp(0.0, 1.0);

    let (wave_lo, wave_hi) = params.wave_amplitude;
    let extra = map_range(level, 0.0, ceiling, 0.0, params.extra_count as f32);
    let target = (params.base_count as f32 + extra).round() as usize;

    VisualParameters {
        hue_drift,
        wave_amplitude: map_range(signal.bass, 0.0, 255.0, wave_lo, wave_hi),
        vertical_drift: map_range(signal.bass, 0.0, 255.0, 0.0, params.vertical_drift_max),
        tilt: map_range(signal.mid, 0.0, 255.0, 0.0, 255.0 * params.tilt_per_mid),
        band_alpha: map_range(level, 0.0, ceiling, params.band_alpha.0, params.band_alpha.1),
        target_particle_count: target.clamp(params.min_count, params.max_count),
        flow_strength: params.base_flow + map_range(level, 0.0, 1.0, 0.0, params.flow_gain),
        gain: map_range(signal.bass, 0.0, 255.0, params.gain.0, params.gain.1),
        particle_alpha: map_range(
            signal.high,
            0.0,
            255.0,
            params.particle_alpha.0,
            params.particle_alpha.1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(amplitude: f32, bass: f32, mid: f32, high: f32) -> SignalFrame {
        SignalFrame {
            amplitude,
            bass,
            mid,
            high,
        }
    }

    #[test]
    fn test_map_range_clamps_and_handles_degenerate_input() {
        assert_eq!(map_range(0.8, 0.0, 0.4, 0.0, 10.0), 10.0);
        assert_eq!(map_range(-1.0, 0.0, 0.4, 0.0, 10.0), 0.0);
        assert_eq!(map_range(0.2, 0.0, 0.4, 0.0, 10.0), 5.0);
        assert_eq!(map_range(3.0, 2.0, 2.0, 7.0, 9.0), 7.0);
        assert_eq!(map_range(f32::NAN, 0.0, 1.0, 7.0, 9.0), 7.0);
        // Decreasing target range
        assert_eq!(map_range(0.0, 0.0, 200.0, 3.5, 0.1), 3.5);
        assert_eq!(map_range(500.0, 0.0, 200.0, 3.5, 0.1), 0.1);
    }

    #[test]
    fn test_silence_maps_to_lower_bounds() {
        let params = MappingParams::default();
        let out = map_parameters(&frame(0.0, 0.0, 0.0, 0.0), Clock::default(), &params);

        assert_eq!(out.wave_amplitude, 20.0);
        assert_eq!(out.vertical_drift, 0.0);
        assert_eq!(out.tilt, 0.0);
        assert_eq!(out.band_alpha, 0.6);
        assert_eq!(out.target_particle_count, params.base_count);
        assert_eq!(out.flow_strength, params.base_flow);
        assert_eq!(out.gain, 0.8);
        // sin(0) = 0 puts the slow oscillation at its midpoint
        assert_eq!(out.hue_drift, 0.5);
    }

    #[test]
    fn test_saturated_signal_maps_to_upper_bounds() {
        let params = MappingParams::default();
        let out = map_parameters(&frame(1.0, 255.0, 255.0, 255.0), Clock::default(), &params);

        assert_eq!(out.wave_amplitude, 80.0);
        assert_eq!(out.vertical_drift, 40.0);
        assert_eq!(out.band_alpha, 1.0);
        assert_eq!(out.target_particle_count, 1600);
        assert_eq!(out.gain, 1.4);
        assert_eq!(out.particle_alpha, 61.0);
        assert!((out.flow_strength - 2.5).abs() < 1e-6);
        assert!((out.hue_drift - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_wave_amplitude_monotonic_in_bass() {
        let params = MappingParams::default();
        let mut last = f32::MIN;
        for bass in 0..=255 {
            let out = map_parameters(&frame(0.0, bass as f32, 0.0, 0.0), Clock::default(), &params);
            assert!(out.wave_amplitude >= last);
            last = out.wave_amplitude;
        }
    }

    #[test]
    fn test_target_count_respects_hard_bounds() {
        let params = MappingParams {
            base_count: 1900,
            extra_count: 600,
            ..MappingParams::default()
        };
        let out = map_parameters(&frame(0.4, 0.0, 0.0, 0.0), Clock::default(), &params);
        assert_eq!(out.target_particle_count, params.max_count);

        let params = MappingParams {
            base_count: 10,
            ..MappingParams::default()
        };
        let out = map_parameters(&frame(0.0, 0.0, 0.0, 0.0), Clock::default(), &params);
        assert_eq!(out.target_particle_count, params.min_count);
    }

    #[test]
    fn test_hue_drift_ceiling() {
        let params = MappingParams::default();
        // Peak of the oscillation plus a full amplitude boost still caps at 1
        let peak_ms = std::f64::consts::FRAC_PI_2 / params.hue_rate;
        let out = map_parameters(&frame(0.4, 0.0, 0.0, 0.0), Clock::new(0, peak_ms), &params);
        assert_eq!(out.hue_drift, 1.0);
    }
}
