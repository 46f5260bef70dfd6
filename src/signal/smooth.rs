//! Rate-limited ramp for values that must not step audibly.

/// Moves toward a target by at most `rate_per_ms` per elapsed millisecond
#[derive(Debug, Clone)]
pub struct Smoother {
    value: Option<f32>,
    rate_per_ms: f32,
    last_ms: f64,
}

impl Smoother {
    /// A ramp that covers `span` in `ramp_ms`
    pub fn new(span: f32, ramp_ms: f64) -> Self {
        let rate_per_ms = if ramp_ms > 0.0 {
            (span.abs() as f64 / ramp_ms) as f32
        } else {
            f32::INFINITY
        };
        Self {
            value: None,
            rate_per_ms,
            last_ms: 0.0,
        }
    }

    /// Current smoothed value, if any target has been seen
    pub fn value(&self) -> Option<f32> {
        self.value
    }

    /// Advance toward `target` at time `now_ms` and return the new value
    ///
    /// The first call snaps to the target.
    pub fn update(&mut self, target: f32, now_ms: f64) -> f32 {
        let dt = (now_ms - self.last_ms).max(0.0) as f32;
        self.last_ms = now_ms;

        let next = match self.value {
            Some(current) if self.rate_per_ms.is_finite() => {
                let max_step = self.rate_per_ms * dt;
                let delta = target - current;
                if delta.abs() <= max_step {
                    target
                } else {
                    current + max_step.copysign(delta)
                }
            }
            _ => target,
        };
        self.value = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_snaps() {
        let mut smoother = Smoother::new(0.6, 250.0);
        assert_eq!(smoother.update(1.1, 0.0), 1.1);
    }

    #[test]
    fn test_ramp_is_rate_limited() {
        let mut smoother = Smoother::new(0.6, 300.0);
        smoother.update(0.8, 0.0);

        // 0.002 per ms: 100ms covers 0.2 of the 0.6 step
        let v = smoother.update(1.4, 100.0);
        assert!((v - 1.0).abs() < 1e-5);

        let v = smoother.update(1.4, 1000.0);
        assert_eq!(v, 1.4);
    }

    #[test]
    fn test_clock_going_backwards_holds_value() {
        let mut smoother = Smoother::new(1.0, 100.0);
        smoother.update(0.0, 500.0);
        assert_eq!(smoother.update(1.0, 400.0), 0.0);
    }

    #[test]
    fn test_zero_ramp_is_instant() {
        let mut smoother = Smoother::new(1.0, 0.0);
        smoother.update(0.0, 0.0);
        assert_eq!(smoother.update(1.0, 1.0), 1.0);
    }
}
