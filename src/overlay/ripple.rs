use glam::Vec2;

use crate::params::RippleParams;

/// Expanding, fading ring spawned when a voice line starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub radius: f32,
    /// [0, 255]
    pub alpha: f32,
}

impl Ripple {
    pub fn new(center: Vec2, params: &RippleParams) -> Self {
        Self {
            center,
            radius: 0.0,
            alpha: params.start_alpha.clamp(0.0, 255.0),
        }
    }

    pub fn step(&mut self, params: &RippleParams) {
        self.radius += params.growth;
        self.alpha = (self.alpha - params.fade).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ripple_grows_then_dies() {
        let params = RippleParams::default();
        let mut ripple = Ripple::new(Vec2::new(10.0, 10.0), &params);

        // 180 / 3 = 60 frames
        for _ in 0..59 {
            ripple.step(&params);
            assert!(!ripple.is_dead());
        }
        ripple.step(&params);
        assert!(ripple.is_dead());
        assert_eq!(ripple.radius, 60.0 * 2.5);
    }
}
