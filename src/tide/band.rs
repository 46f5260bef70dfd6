//! Band descriptors, fixed at creation.

use rand::{rngs::StdRng, Rng};

use crate::params::BandParams;

/// One horizontal ribbon's static description
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub color: [u8; 3],
    /// Baseline as a fraction of canvas height, so resizes need no update
    pub base_y: f32,
    /// Resting rotation (radians)
    pub tilt: f32,
    /// Phase advance per frame
    pub phase_speed: f32,
    pub noise_offset: f32,
    /// Alpha on a 0-100 scale before the amplitude multiplier
    pub base_alpha: f32,
}

impl Band {
    /// Band `index` of `count`, baselines spread evenly from top to bottom
    pub fn scatter(
        index: usize,
        count: usize,
        color: [u8; 3],
        params: &BandParams,
        rng: &mut StdRng,
    ) -> Self {
        let base_y = if count > 1 {
            index as f32 / (count - 1) as f32
        } else {
            0.5
        };

        Self {
            color,
            base_y,
            tilt: rng.random_range(-params.tilt_range..params.tilt_range),
            phase_speed: rng.random_range(params.phase_speed.0..params.phase_speed.1),
            noise_offset: rng.random_range(0.0..params.noise_offset_max),
            base_alpha: rng.random_range(params.base_alpha.0..params.base_alpha.1),
        }
    }
}
