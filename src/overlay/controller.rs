//! Overlay controller: schedules, spawns, ages and draws lines and ripples.

use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use tracing::{debug, info};

use super::line::OverlayLine;
use super::ripple::Ripple;
use super::scheduler::TriggerScheduler;
use super::text::LineGenerator;
use super::voice::Voice;
use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::params::OverlayParams;
use crate::signal::Clock;

/// Owns the active line set, the ripples and the trigger timer
pub struct OverlayController {
    params: OverlayParams,
    scheduler: TriggerScheduler,
    generator: Box<dyn LineGenerator>,
    lines: Vec<OverlayLine>,
    ripples: Vec<Ripple>,
}

impl OverlayController {
    pub fn new(
        params: OverlayParams,
        generator: Box<dyn LineGenerator>,
        now_ms: f64,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            scheduler: TriggerScheduler::new(params.trigger.clone(), now_ms, rng),
            params,
            generator,
            lines: Vec::new(),
            ripples: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[OverlayLine] {
        &self.lines
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    /// Text of the most recently spawned live line
    pub fn newest_line(&self) -> Option<&str> {
        self.lines.last().map(|line| line.text.as_str())
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Restart the trigger interval, e.g. when the session starts
    pub fn rearm(&mut self, now_ms: f64, rng: &mut StdRng) {
        self.scheduler.rearm(now_ms, rng);
    }

    /// Advance one frame
    ///
    /// Existing lines and ripples age whether or not the session has
    /// started; new lines are only triggered once it has. Returns the text
    /// of a line spawned this frame.
    pub fn step(
        &mut self,
        clock: Clock,
        level: f32,
        started: bool,
        bounds: Vec2,
        rng: &mut StdRng,
        voice: &mut dyn Voice,
    ) -> Option<String> {
        for line in &mut self.lines {
            line.step(&self.params);
        }
        self.lines.retain(|line| !line.is_dead());

        for ripple in &mut self.ripples {
            ripple.step(&self.params.ripple);
        }
        self.ripples.retain(|ripple| !ripple.is_dead());

        if !started || !self.scheduler.poll(clock.elapsed_ms, level, rng) {
            return None;
        }

        if self.lines.len() >= self.params.max_lines {
            debug!("Overlay full ({} lines), skipping trigger", self.lines.len());
            return None;
        }

        let text = self.generator.next_line(rng)?;
        info!("tide line ({}): {}", self.generator.name(), text);
        self.spawn(text.clone(), started, bounds, rng, voice);
        Some(text)
    }

    /// Show and speak a fixed line immediately, bypassing the scheduler
    pub fn announce(&mut self, text: &str, bounds: Vec2, rng: &mut StdRng, voice: &mut dyn Voice) {
        if self.lines.len() >= self.params.max_lines {
            self.lines.remove(0);
        }
        self.spawn(text.to_string(), true, bounds, rng, voice);
    }

    fn spawn(
        &mut self,
        text: String,
        started: bool,
        bounds: Vec2,
        rng: &mut StdRng,
        voice: &mut dyn Voice,
    ) {
        let (x_lo, x_hi) = self.params.safe_x;
        let (y_lo, y_hi) = self.params.safe_y;
        let position = Vec2::new(
            bounds.x * lerp(x_lo, x_hi, rng.random()),
            bounds.y * lerp(y_lo, y_hi, rng.random()),
        );

        if started {
            match voice.speak(&text, &self.params.voice) {
                Ok(()) => self.spawn_ripple(bounds, rng),
                Err(e) => debug!("Skipping speech: {}", e),
            }
        }

        self.lines.push(OverlayLine::new(text, position));
    }

    fn spawn_ripple(&mut self, bounds: Vec2, rng: &mut StdRng) {
        if self.params.ripple.max_alive == 0 {
            return;
        }
        if self.ripples.len() >= self.params.ripple.max_alive {
            self.ripples.remove(0);
        }
        let center = Vec2::new(
            bounds.x * rng.random::<f32>(),
            bounds.y * rng.random::<f32>(),
        );
        self.ripples.push(Ripple::new(center, &self.params.ripple));
    }

    /// Draw ripples, then lines, tinted by `hue_drift`
    pub fn draw(&self, canvas: &mut dyn Canvas, hue_drift: f32) {
        let (from, to) = self.params.drift_colors;
        let tint = Rgba::rgb(from).lerp(Rgba::rgb(to), hue_drift);

        for ripple in &self.ripples {
            canvas.stroke_circle(
                ripple.center,
                ripple.radius,
                self.params.ripple.stroke,
                tint.with_alpha(ripple.alpha),
            );
        }
        for line in &self.lines {
            canvas.text(
                &line.text,
                line.position,
                self.params.text_size,
                tint.with_alpha(line.alpha),
            );
        }
    }
}

fn lerp(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::error::{LowtideError, Result};
    use crate::overlay::text::FallbackList;
    use crate::overlay::LogVoice;
    use crate::params::VoiceSettings;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(1000.0, 500.0);
    const FRAME_MS: f64 = 1000.0 / 60.0;

    struct MuteVoice;

    impl Voice for MuteVoice {
        fn speak(&mut self, _text: &str, _settings: &VoiceSettings) -> Result<()> {
            Err(LowtideError::Voice("no speech device".into()))
        }
    }

    fn controller(params: OverlayParams, rng: &mut StdRng) -> OverlayController {
        OverlayController::new(params, Box::new(FallbackList), 0.0, rng)
    }

    fn fixed(interval_ms: f64) -> OverlayParams {
        OverlayParams {
            trigger: crate::params::TriggerPolicy::Fixed { interval_ms },
            ..OverlayParams::default()
        }
    }

    #[test]
    fn test_no_triggers_before_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut overlay = controller(fixed(100.0), &mut rng);
        let mut voice = LogVoice::new();

        for frame in 0..600 {
            let clock = Clock::new(frame, frame as f64 * FRAME_MS);
            assert!(overlay.step(clock, 0.2, false, BOUNDS, &mut rng, &mut voice).is_none());
        }
        assert!(overlay.lines().is_empty());
        assert_eq!(voice.spoken(), 0);
    }

    #[test]
    fn test_trigger_spawns_line_in_safe_band_with_ripple() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut overlay = controller(fixed(1_000.0), &mut rng);
        let mut voice = LogVoice::new();

        let mut fired = None;
        for frame in 0..70 {
            let clock = Clock::new(frame, frame as f64 * FRAME_MS);
            if let Some(text) = overlay.step(clock, 0.0, true, BOUNDS, &mut rng, &mut voice) {
                fired = Some(text);
            }
        }

        let text = fired.unwrap();
        assert_eq!(overlay.newest_line(), Some(text.as_str()));
        let line = &overlay.lines()[0];
        assert!(line.position.x >= 200.0 && line.position.x <= 800.0);
        assert!(line.position.y >= 350.0 && line.position.y <= 450.0);
        assert_eq!(voice.spoken(), 1);
        assert_eq!(overlay.ripples().len(), 1);
    }

    #[test]
    fn test_unavailable_voice_skips_ripple_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut overlay = controller(OverlayParams::default(), &mut rng);

        overlay.announce("The river remembers what it carries.", BOUNDS, &mut rng, &mut MuteVoice);
        assert_eq!(overlay.lines().len(), 1);
        assert!(overlay.ripples().is_empty());
    }

    #[test]
    fn test_line_cap_skips_due_triggers() {
        let params = OverlayParams {
            max_lines: 2,
            hold_frames: 10_000,
            ..fixed(100.0)
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut overlay = controller(params, &mut rng);
        let mut voice = LogVoice::new();

        for frame in 0..300 {
            let clock = Clock::new(frame, frame as f64 * FRAME_MS);
            overlay.step(clock, 0.0, true, BOUNDS, &mut rng, &mut voice);
            assert!(overlay.lines().len() <= 2);
        }
        assert_eq!(overlay.lines().len(), 2);
        assert_eq!(voice.spoken(), 2);
    }

    #[test]
    fn test_dead_lines_are_purged() {
        let params = OverlayParams {
            fade_in_step: 255.0,
            hold_frames: 1,
            fade_out_step: 255.0,
            ..OverlayParams::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut overlay = controller(params, &mut rng);
        let mut voice = LogVoice::new();
        overlay.announce("ebb", BOUNDS, &mut rng, &mut voice);

        for frame in 0..4 {
            overlay.step(Clock::new(frame, 0.0), 0.0, true, BOUNDS, &mut rng, &mut voice);
        }
        assert!(overlay.lines().is_empty());
    }

    #[test]
    fn test_draw_tints_by_hue() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut overlay = controller(OverlayParams::default(), &mut rng);
        let mut voice = LogVoice::new();
        overlay.announce("flood", BOUNDS, &mut rng, &mut voice);
        overlay.step(Clock::default(), 0.0, true, BOUNDS, &mut rng, &mut voice);

        let mut canvas = DrawList::new(BOUNDS.x, BOUNDS.y);
        overlay.draw(&mut canvas, 1.0);

        let (to_r, to_g, to_b) = {
            let c = OverlayParams::default().drift_colors.1;
            (c[0], c[1], c[2])
        };
        let (text, color) = canvas.texts().next().unwrap();
        assert_eq!(text, "flood");
        assert_eq!((color.r, color.g, color.b, color.a), (to_r, to_g, to_b, 15));
        assert!(canvas
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Ring { .. })));
    }
}
