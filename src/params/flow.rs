//! Flow-field particle parameters.

use serde::Deserialize;

/// Particle kinematics, pointer interaction and population control
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Spatial scale of the noise field (noise units per pixel)
    pub noise_scale: f64,

    /// Temporal scale of the noise field (noise units per frame)
    pub time_scale: f64,

    /// Noise-to-angle multiplier K: angle spans [0, 2π·K)
    pub angle_multiplier: f32,

    /// Velocity damping per frame (must be in (0, 1))
    pub damping: f32,

    /// Pointer repulsion radius (pixels)
    pub repulsion_radius: f32,

    /// Repulsion force at distance 0 / at the radius
    pub repulsion_force: (f32, f32),

    /// Particles closer than this to the pointer use the shimmer color (pixels)
    pub shimmer_radius: f32,

    /// Largest pool growth or shrink per frame
    pub max_step_per_frame: usize,

    /// Particle radius range (pixels)
    pub radius_range: (f32, f32),

    /// Initial speed range (pixels per frame)
    pub initial_speed: (f32, f32),

    /// Default particle color
    pub calm_color: [u8; 3],

    /// Particle color near the pointer
    pub shimmer_color: [u8; 3],

    /// Perlin noise seed
    pub noise_seed: u32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            noise_scale: 0.0025,
            time_scale: 0.0012,
            angle_multiplier: 4.0,
            damping: 0.94,
            repulsion_radius: 200.0,
            repulsion_force: (3.5, 0.1),
            shimmer_radius: 140.0,
            max_step_per_frame: 15,
            radius_range: (0.75, 1.5),
            initial_speed: (0.3, 1.0),
            calm_color: [93, 255, 253],   // aqua
            shimmer_color: [255, 254, 190], // pale yellow
            noise_seed: 42,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(format!("damping must be in (0, 1), got {}", self.damping));
        }
        if self.max_step_per_frame == 0 {
            return Err("max_step_per_frame must be > 0".to_string());
        }
        if self.repulsion_radius <= 0.0 {
            return Err("repulsion_radius must be > 0".to_string());
        }
        Ok(())
    }
}
