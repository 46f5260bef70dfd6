//! Coherent noise for the flow field and ribbon edges.

use noise::{NoiseFn, Perlin};

/// Seeded Perlin noise remapped to [0, 1]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    /// Create new noise field with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Sample 3D noise at position
    ///
    /// Returns value in range [0, 1]
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f32 {
        to_unit(self.perlin.get([x, y, z]))
    }

    /// Sample noise along a single axis
    ///
    /// Returns value in range [0, 1]
    pub fn sample_1d(&self, x: f64) -> f32 {
        // Off-lattice second coordinate so integer x does not pin the value to 0.5
        to_unit(self.perlin.get([x, 0.5]))
    }
}

fn to_unit(value: f64) -> f32 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0) as f32
}
