//! Tide bands: five sediment-colored ribbons whose wavy edge is
//! resynthesized every frame from a sine + noise surface.
//!
//! Descriptors never change after setup. Each frame derives a fresh
//! `Ribbon` per band from the descriptor, the bass/mid driven visual
//! parameters and the frame clock.

mod band;

pub use band::Band;

use glam::{Affine2, Vec2};
use rand::rngs::StdRng;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::noise::NoiseField;
use crate::params::{BandParams, SEDIMENT_PALETTE};
use crate::signal::{Clock, VisualParameters};

/// Closed ribbon polygon in canvas space
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    pub points: Vec<Vec2>,
    pub color: Rgba,
}

/// The fixed set of bands plus this frame's geometry
pub struct TideBands {
    bands: Vec<Band>,
    ribbons: Vec<Ribbon>,
    noise: NoiseField,
    params: BandParams,
}

impl TideBands {
    /// One band per palette entry, back to front
    pub fn new(params: BandParams, noise_seed: u32, rng: &mut StdRng) -> Self {
        let count = SEDIMENT_PALETTE.len();
        let bands = SEDIMENT_PALETTE
            .iter()
            .enumerate()
            .map(|(i, &color)| Band::scatter(i, count, color, &params, rng))
            .collect();

        Self {
            bands,
            ribbons: Vec::with_capacity(count),
            noise: NoiseField::new(noise_seed),
            params,
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Geometry from the last `update`, in draw order
    pub fn ribbons(&self) -> &[Ribbon] {
        &self.ribbons
    }

    /// Resynthesize every ribbon for this frame
    pub fn update(&mut self, visual: &VisualParameters, clock: Clock, bounds: Vec2) {
        self.ribbons.clear();
        for band in &self.bands {
            let ribbon = synthesize(band, visual, clock, bounds, &self.noise, &self.params);
            self.ribbons.push(ribbon);
        }
    }

    /// Fill ribbons back to front (index order)
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for ribbon in &self.ribbons {
            canvas.fill_polygon(&ribbon.points, ribbon.color);
        }
    }
}

/// Build one band's ribbon for the current frame
///
/// In band space the top edge is
/// `sin(x·f + phase)·A + noise(phase + x·k)·N − N/2` sampled every `step`
/// pixels across `[-span·w, span·w]`, closed by two corners at the ribbon
/// depth. Band space is placed at the band's drifting baseline, rotated by
/// resting tilt + wobble + mid-driven tilt, and the whole group sways
/// slightly about the canvas center.
pub fn synthesize(
    band: &Band,
    visual: &VisualParameters,
    clock: Clock,
    bounds: Vec2,
    noise: &NoiseField,
    params: &BandParams,
) -> Ribbon {
    let frame = clock.frame as f64;
    let center = bounds * 0.5;

    let (sway_rate, sway_amount) = params.sway;
    let sway = (frame * sway_rate as f64).sin() as f32 * sway_amount;
    let drift = (frame * (band.phase_speed * params.drift_rate) as f64).sin() as f32
        * visual.vertical_drift;
    let wobble = (frame * band.phase_speed as f64 + band.noise_offset as f64).sin() as f32
        * params.wobble;

    let transform = Affine2::from_translation(center)
        * Affine2::from_angle(sway)
        * Affine2::from_translation(-center)
        * Affine2::from_translation(Vec2::new(center.x, band.base_y * bounds.y + drift))
        * Affine2::from_angle(band.tilt + wobble + visual.tilt);

    let phase = band.noise_offset as f64 + frame * params.phase_rate as f64;
    let half_span = params.span * bounds.x;
    let samples = ((2.0 * half_span) / params.step).floor().max(0.0) as usize;
    let half_noise = params.noise_amplitude * 0.5;

    let mut points = Vec::with_capacity(samples + 3);
    for i in 0..=samples {
        let x = -half_span + i as f32 * params.step;
        let wave = (x as f64 * params.wave_frequency as f64 + phase).sin() as f32;
        let grain = noise.sample_1d(phase + x as f64 * params.noise_frequency as f64);
        let y = wave * visual.wave_amplitude + grain * params.noise_amplitude - half_noise;
        points.push(transform.transform_point2(Vec2::new(x, y)));
    }

    let depth = params.depth_fraction * bounds.y;
    points.push(transform.transform_point2(Vec2::new(half_span, depth)));
    points.push(transform.transform_point2(Vec2::new(-half_span, depth)));

    Ribbon {
        points,
        color: Rgba::rgb(band.color).with_alpha_percent(band.base_alpha * visual.band_alpha),
    }
}
