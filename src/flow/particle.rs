//! A single flow-field particle.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{rngs::StdRng, Rng};

use crate::params::FlowParams;

/// Particle kinematic state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulated during the current frame, zeroed after integration
    pub force: Vec2,
    pub radius: f32,
    /// Within the shimmer radius of the pointer on the last step
    pub near_pointer: bool,
}

impl Particle {
    /// Spawn at a uniformly random position with a random heading
    pub fn spawn(rng: &mut StdRng, bounds: Vec2, params: &FlowParams) -> Self {
        let position = Vec2::new(
            rng.random_range(0.0..bounds.x.max(f32::EPSILON)),
            rng.random_range(0.0..bounds.y.max(f32::EPSILON)),
        );
        let (speed_lo, speed_hi) = params.initial_speed;
        let (radius_lo, radius_hi) = params.radius_range;
        let heading = Vec2::from_angle(rng.random_range(0.0..TAU));
        let velocity = heading * lerp(speed_lo, speed_hi, rng.random());

        Self {
            position,
            velocity,
            force: Vec2::ZERO,
            radius: lerp(radius_lo, radius_hi, rng.random()),
            near_pointer: false,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Fold the accumulated force into velocity, damp, move, reset force
    pub fn integrate(&mut self, damping: f32) {
        self.velocity += self.force;
        self.velocity *= damping;
        self.position += self.velocity;
        self.force = Vec2::ZERO;
    }

    /// Push away from `pointer` when closer than the repulsion radius
    ///
    /// Strength falls off linearly from `repulsion_force.0` at distance 0 to
    /// `repulsion_force.1` at the radius. A particle exactly on the pointer
    /// has no defined direction and is left alone.
    pub fn repel(&mut self, pointer: Vec2, params: &FlowParams) {
        let offset = self.position - pointer;
        let distance = offset.length();
        self.near_pointer = distance < params.shimmer_radius;

        if distance < params.repulsion_radius {
            let (near, far) = params.repulsion_force;
            let strength = near + (far - near) * (distance / params.repulsion_radius);
            self.velocity += offset.normalize_or_zero() * strength;
        }
    }

    /// Remap position into [0, width) x [0, height)
    pub fn wrap(&mut self, bounds: Vec2) {
        self.position.x = wrap_coord(self.position.x, bounds.x);
        self.position.y = wrap_coord(self.position.y, bounds.y);
    }
}

/// Toroidal wrap into [0, extent), exclusive on the upper bound
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    if !value.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn lerp(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}
