//! Deadline-driven trigger scheduling.

use rand::{rngs::StdRng, Rng};

use crate::params::TriggerPolicy;
use crate::signal::map_range;

/// Decides, once per frame, whether the overlay should fire
#[derive(Debug, Clone)]
pub struct TriggerScheduler {
    policy: TriggerPolicy,
    last_ms: f64,
    /// Delay before the next trigger may fire
    delay_ms: f64,
}

impl TriggerScheduler {
    pub fn new(policy: TriggerPolicy, now_ms: f64, rng: &mut StdRng) -> Self {
        let mut scheduler = Self {
            policy,
            last_ms: now_ms,
            delay_ms: 0.0,
        };
        scheduler.rearm(now_ms, rng);
        scheduler
    }

    /// Restart the interval from `now_ms`
    pub fn rearm(&mut self, now_ms: f64, rng: &mut StdRng) {
        self.last_ms = now_ms;
        self.delay_ms = match self.policy {
            TriggerPolicy::Fixed { interval_ms } => interval_ms,
            TriggerPolicy::Randomized { min_ms, max_ms } => rng.random_range(min_ms..=max_ms),
            TriggerPolicy::AmplitudeGated { interval_ms, .. } => interval_ms,
        };
    }

    pub fn last_trigger_ms(&self) -> f64 {
        self.last_ms
    }

    /// True when a trigger is due; a due trigger rearms the timer
    pub fn poll(&mut self, now_ms: f64, level: f32, rng: &mut StdRng) -> bool {
        if now_ms - self.last_ms < self.delay_ms {
            return false;
        }

        let due = match self.policy {
            TriggerPolicy::AmplitudeGated {
                p_low,
                p_high,
                level_ceiling,
                ..
            } => {
                let p = map_range(level, 0.0, level_ceiling, p_low as f32, p_high as f32);
                rng.random::<f32>() < p
            }
            _ => true,
        };

        if due {
            self.rearm(now_ms, rng);
        }
        due
    }
}
