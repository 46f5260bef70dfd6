//! Tide band geometry parameters and the sediment palette.

use serde::Deserialize;

/// Sediment palette, one entry per band (back to front)
pub const SEDIMENT_PALETTE: [[u8; 3]; 5] = [
    [172, 161, 122], // sand-gold
    [91, 139, 120],  // seagrass
    [2, 122, 126],   // teal tide
    [22, 76, 106],   // deep current
    [1, 13, 81],     // midnight basin
];

/// Band descriptor ranges and ribbon synthesis constants
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandParams {
    /// Largest initial tilt magnitude (radians)
    pub tilt_range: f32,

    /// Phase speed range (radians per frame)
    pub phase_speed: (f32, f32),

    /// Upper bound for the per-band noise offset
    pub noise_offset_max: f32,

    /// Base alpha range on a 0-100 scale
    pub base_alpha: (f32, f32),

    /// Horizontal vertex spacing (pixels)
    pub step: f32,

    /// Ribbon half-span as a multiple of canvas width
    pub span: f32,

    /// Sine frequency along x (radians per pixel)
    pub wave_frequency: f32,

    /// Noise frequency along x (noise units per pixel)
    pub noise_frequency: f32,

    /// Noise contribution peak-to-peak (pixels)
    pub noise_amplitude: f32,

    /// Phase advance per frame
    pub phase_rate: f32,

    /// Per-band rotational wobble amplitude (radians)
    pub wobble: f32,

    /// Vertical drift oscillation multiplier applied to the phase speed
    pub drift_rate: f32,

    /// Ribbon depth below its baseline as a fraction of canvas height
    pub depth_fraction: f32,

    /// Whole-group sway rate (radians per frame) and amplitude (radians)
    pub sway: (f32, f32),

    /// Trail fade alpha on a 0-100 scale
    pub trail_alpha: f32,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            tilt_range: std::f32::consts::PI / 10.0,
            phase_speed: (0.0006, 0.0014),
            noise_offset_max: 1000.0,
            base_alpha: (35.0, 65.0),
            step: 20.0,
            span: 1.5,
            wave_frequency: 0.004,
            noise_frequency: 0.001,
            noise_amplitude: 20.0,
            phase_rate: 0.0003,
            wobble: 0.04,
            drift_rate: 20.0,
            depth_fraction: 1.0 / 2.5,
            sway: (0.00008, 0.02),
            trail_alpha: 6.0,
        }
    }
}

impl BandParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.step <= 0.0 {
            return Err(format!("band step must be > 0, got {}", self.step));
        }
        if self.phase_speed.0 >= self.phase_speed.1
            || self.base_alpha.0 >= self.base_alpha.1
            || self.tilt_range <= 0.0
            || self.noise_offset_max <= 0.0
        {
            return Err("band ranges must be non-empty".to_string());
        }
        Ok(())
    }
}
