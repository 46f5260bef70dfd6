//! Audio-to-visual parameter mapping bounds.

use serde::Deserialize;

/// Bounds and rates for every signal-to-parameter mapping
///
/// All linear maps clamp to their target range, so each output stays inside
/// the pair of bounds named here regardless of input.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MappingParams {
    /// Amplitude level at which every amplitude-driven mapping saturates
    pub level_ceiling: f32,

    /// Hue oscillation rate (radians per elapsed millisecond)
    pub hue_rate: f64,

    /// Largest hue boost contributed by the amplitude level
    pub hue_boost_max: f32,

    /// Ribbon wave amplitude at silent / full bass (pixels)
    pub wave_amplitude: (f32, f32),

    /// Largest band vertical drift at full bass (pixels)
    pub vertical_drift_max: f32,

    /// Band tilt per unit of mid energy (radians)
    pub tilt_per_mid: f32,

    /// Band alpha multiplier at silent / saturated level
    pub band_alpha: (f32, f32),

    /// Particle population at silence
    pub base_count: usize,

    /// Extra particles added at a saturated level
    pub extra_count: usize,

    /// Hard floor for the particle target
    pub min_count: usize,

    /// Hard ceiling for the particle target
    pub max_count: usize,

    /// Flow magnitude at silence (pixels per frame²)
    pub base_flow: f32,

    /// Extra flow magnitude per unit amplitude level
    pub flow_gain: f32,

    /// Transport gain at silent / full bass
    pub gain: (f32, f32),

    /// Particle alpha at silent / full high band (0-255)
    pub particle_alpha: (f32, f32),
}

impl Default for MappingParams {
    fn default() -> Self {
        Self {
            level_ceiling: 0.4,
            hue_rate: 0.0004,
            hue_boost_max: 0.3,
            wave_amplitude: (20.0, 80.0),
            vertical_drift_max: 40.0,
            tilt_per_mid: 0.0004,
            band_alpha: (0.6, 1.0),
            base_count: 1000,
            extra_count: 600,
            min_count: 200,
            max_count: 2000,
            base_flow: 0.5,
            flow_gain: 2.0,
            gain: (0.8, 1.4),
            // 8..24 on a 0-100 alpha scale
            particle_alpha: (20.0, 61.0),
        }
    }
}

impl MappingParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_count > self.max_count {
            return Err(format!(
                "min_count ({}) exceeds max_count ({})",
                self.min_count, self.max_count
            ));
        }
        if self.level_ceiling <= 0.0 {
            return Err("level_ceiling must be > 0".to_string());
        }
        if self.wave_amplitude.0 > self.wave_amplitude.1 {
            return Err("wave_amplitude bounds must be increasing".to_string());
        }
        Ok(())
    }
}
