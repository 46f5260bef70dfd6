//! Flow-field particle system with adaptive population and pointer interaction.
//!
//! Particles live in an arena (`Vec<Particle>`) with a logical active count.
//! Growing reuses dormant slots before allocating; shrinking only lowers the
//! count. Nothing downstream relies on particle identity across frames.

mod particle;

pub use particle::{wrap_coord, Particle};

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::noise::NoiseField;
use crate::params::FlowParams;
use crate::signal::{Clock, VisualParameters};

/// Pool of particles steered by a noise flow field
pub struct ParticleSystem {
    particles: Vec<Particle>,
    active: usize,
    noise: NoiseField,
    params: FlowParams,
}

impl ParticleSystem {
    /// Create a system with `initial` particles scattered over `bounds`
    pub fn new(params: FlowParams, initial: usize, bounds: Vec2, rng: &mut StdRng) -> Self {
        let particles: Vec<Particle> = (0..initial)
            .map(|_| Particle::spawn(rng, bounds, &params))
            .collect();

        Self {
            active: particles.len(),
            particles,
            noise: NoiseField::new(params.noise_seed),
            params,
        }
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles[..self.active]
    }

    /// Advance every live particle one frame, then resize toward the target
    ///
    /// `pointer` outside `bounds` (or absent) contributes no force.
    pub fn step(
        &mut self,
        visual: &VisualParameters,
        pointer: Option<Vec2>,
        clock: Clock,
        bounds: Vec2,
        rng: &mut StdRng,
    ) {
        let pointer = pointer.filter(|p| {
            p.x >= 0.0 && p.y >= 0.0 && p.x < bounds.x && p.y < bounds.y
        });
        let params = &self.params;
        let noise = &self.noise;
        let t = clock.frame as f64 * params.time_scale;

        for particle in &mut self.particles[..self.active] {
            let sample = noise.sample_3d(
                particle.position.x as f64 * params.noise_scale,
                particle.position.y as f64 * params.noise_scale,
                t,
            );
            let angle = sample * TAU * params.angle_multiplier;
            particle.apply_force(Vec2::from_angle(angle) * visual.flow_strength);
            particle.integrate(params.damping);

            match pointer {
                Some(p) => particle.repel(p, params),
                None => particle.near_pointer = false,
            }

            particle.wrap(bounds);
        }

        self.resize_toward(visual.target_particle_count, bounds, rng);
    }

    /// Move the population toward `target` by at most `max_step_per_frame`
    ///
    /// Returns the signed change applied this frame.
    pub fn resize_toward(&mut self, target: usize, bounds: Vec2, rng: &mut StdRng) -> isize {
        let cap = self.params.max_step_per_frame;

        if self.active < target {
            let grow = (target - self.active).min(cap);
            for _ in 0..grow {
                let fresh = Particle::spawn(rng, bounds, &self.params);
                if self.active < self.particles.len() {
                    self.particles[self.active] = fresh;
                } else {
                    self.particles.push(fresh);
                }
                self.active += 1;
            }
            grow as isize
        } else {
            let shrink = (self.active - target).min(cap);
            self.active -= shrink;
            -(shrink as isize)
        }
    }

    /// Draw live particles: shimmer color near the pointer, calm elsewhere
    pub fn draw(&self, canvas: &mut dyn Canvas, visual: &VisualParameters) {
        let calm = Rgba::rgb(self.params.calm_color).with_alpha(visual.particle_alpha);
        let shimmer = Rgba::rgb(self.params.shimmer_color).with_alpha(visual.particle_alpha);

        for particle in self.particles() {
            let color = if particle.near_pointer { shimmer } else { calm };
            canvas.fill_circle(particle.position, particle.radius, color);
        }
    }
}
