//! The simulation context owned by the frame loop.
//!
//! `Scene` holds every stateful component plus the random source and runs
//! one frame in a fixed order: aggregate, map, particles, bands, overlay,
//! session, transport gain. Drawing is a separate read-only pass.

use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::error::Result;
use crate::flow::ParticleSystem;
use crate::overlay::{build_generator, OverlayController, Voice};
use crate::params::Config;
use crate::session::{Interaction, SessionState, Transport};
use crate::signal::{
    aggregate, map_parameters, BandSplit, Clock, SignalFrame, Smoother, VisualParameters,
};
use crate::tide::TideBands;

/// Intro prompt shown until the first interaction
pub const INTRO_TEXT: &str = "click to begin low tide";

/// Intro text alpha relative to the session's intro alpha
const INTRO_ALPHA_SCALE: f32 = 0.6;

const INTRO_TEXT_SIZE: f32 = 22.0;

/// Everything the frame loop reads from its collaborators for one tick
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Byte-scaled spectrum from the analyzer
    pub spectrum: &'a [f32],
    /// Amplitude level [0, 1]
    pub level: f32,
    /// Pointer position, `None` when absent
    pub pointer: Option<Vec2>,
    pub clock: Clock,
    /// Canvas (width, height)
    pub bounds: Vec2,
}

pub struct Scene {
    config: Config,
    split: BandSplit,
    rng: StdRng,
    particles: ParticleSystem,
    tide: TideBands,
    overlay: OverlayController,
    session: SessionState,
    gain: Smoother,
    signal: SignalFrame,
    visual: VisualParameters,
    clock: Clock,
    bounds: Vec2,
}

impl Scene {
    /// Build the scene; `seed` makes every random draw reproducible
    ///
    /// The config is validated first, so hand-built configs with empty
    /// random ranges or impossible bounds are rejected here.
    pub fn new(
        config: Config,
        corpus: &[String],
        seed: Option<u64>,
        bounds: Vec2,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mapping = &config.mapping;
        let initial = mapping.base_count.clamp(mapping.min_count, mapping.max_count);
        let particles = ParticleSystem::new(config.flow.clone(), initial, bounds, &mut rng);
        let tide = TideBands::new(
            config.bands.clone(),
            config.flow.noise_seed.wrapping_add(1),
            &mut rng,
        );

        let generator = build_generator(config.overlay.strategy, corpus, &config.overlay);
        let overlay = OverlayController::new(config.overlay.clone(), generator, 0.0, &mut rng);
        info!(
            "Scene ready: {} particles, {} bands, {} lines",
            particles.len(),
            tide.bands().len(),
            overlay.generator_name()
        );

        let (gain_lo, gain_hi) = mapping.gain;
        let gain = Smoother::new(gain_hi - gain_lo, config.session.gain_ramp_ms);
        let signal = SignalFrame::default();
        let visual = map_parameters(&signal, Clock::default(), mapping);

        Ok(Self {
            split: BandSplit::from(&config.analysis),
            rng,
            particles,
            tide,
            overlay,
            session: SessionState::new(),
            gain,
            signal,
            visual,
            clock: Clock::default(),
            bounds,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn signal(&self) -> &SignalFrame {
        &self.signal
    }

    pub fn visual(&self) -> &VisualParameters {
        &self.visual
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn tide(&self) -> &TideBands {
        &self.tide
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Smoothed transport gain, once the first frame has run
    pub fn gain(&self) -> Option<f32> {
        self.gain.value()
    }

    /// Run one frame; returns the text of an overlay line triggered this frame
    pub fn tick(
        &mut self,
        input: FrameInput<'_>,
        transport: &mut dyn Transport,
        voice: &mut dyn Voice,
    ) -> Option<String> {
        self.clock = input.clock;
        self.bounds = input.bounds;

        self.signal = aggregate(input.spectrum, input.level, self.split);
        self.visual = map_parameters(&self.signal, input.clock, &self.config.mapping);

        self.particles.step(
            &self.visual,
            input.pointer,
            input.clock,
            input.bounds,
            &mut self.rng,
        );
        self.tide.update(&self.visual, input.clock, input.bounds);

        let line = self.overlay.step(
            input.clock,
            self.signal.amplitude,
            self.session.started(),
            input.bounds,
            &mut self.rng,
            voice,
        );

        let now = input.clock.elapsed_ms;
        self.session.tick(now, transport, &self.config.session);
        transport.set_gain(self.gain.update(self.visual.gain, now));

        line
    }

    /// Handle a user interaction at `now_ms`
    pub fn interact(
        &mut self,
        now_ms: f64,
        transport: &mut dyn Transport,
        voice: &mut dyn Voice,
    ) -> Interaction {
        let interaction = self.session.interact(now_ms, transport, &self.config.session);

        if interaction == Interaction::Started {
            self.overlay.rearm(now_ms, &mut self.rng);
            let opening = self.config.overlay.opening_line.clone();
            if !opening.is_empty() {
                self.overlay.announce(&opening, self.bounds, &mut self.rng, voice);
            }
        }
        interaction
    }

    /// Draw the current frame
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let (width, height) = canvas.size();
        let trail = Rgba::BLACK.with_alpha_percent(self.config.bands.trail_alpha);
        canvas.fill_rect(Vec2::ZERO, Vec2::new(width, height), trail);

        self.tide.draw(canvas);
        self.particles.draw(canvas, &self.visual);
        self.overlay.draw(canvas, self.visual.hue_drift);

        if let Some(alpha) = self.session.intro_text_alpha() {
            canvas.text(
                INTRO_TEXT,
                Vec2::new(width * 0.5, height * 0.5),
                INTRO_TEXT_SIZE,
                Rgba::WHITE.with_alpha(alpha * INTRO_ALPHA_SCALE),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::overlay::LogVoice;
    use crate::session::tests::FakeTransport;

    const BOUNDS: Vec2 = Vec2::new(640.0, 360.0);

    fn scene() -> Scene {
        Scene::new(Config::default(), &[], Some(7), BOUNDS).unwrap()
    }

    fn input(spectrum: &[f32], level: f32, frame: u64) -> FrameInput<'_> {
        FrameInput {
            spectrum,
            level,
            pointer: None,
            clock: Clock::new(frame, frame as f64 * 1000.0 / 60.0),
            bounds: BOUNDS,
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.bands.phase_speed = (0.001, 0.001);
        let err = Scene::new(config, &[], Some(7), BOUNDS).err();
        assert!(matches!(err, Some(crate::LowtideError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_corpus_uses_fallback_lines() {
        let scene = scene();
        assert_eq!(scene.overlay().generator_name(), "fallback");

        let corpus = vec!["Gulls ride the slack water.".to_string()];
        let config = Config {
            overlay: crate::params::OverlayParams {
                strategy: crate::params::TextStrategy::Corpus,
                ..Default::default()
            },
            ..Config::default()
        };
        let scene = Scene::new(config, &corpus, Some(7), BOUNDS).unwrap();
        assert_eq!(scene.overlay().generator_name(), "corpus");
    }

    #[test]
    fn test_tick_feeds_gain_to_transport() {
        let mut scene = scene();
        let mut transport = FakeTransport::default();
        let mut voice = LogVoice::new();
        let spectrum = vec![255.0; 256];

        scene.tick(input(&spectrum, 0.0, 0), &mut transport, &mut voice);
        assert_eq!(transport.gain, 1.4);
        assert_eq!(scene.gain(), Some(1.4));

        // Silence ramps the gain down rather than stepping
        scene.tick(input(&[], 0.0, 1), &mut transport, &mut voice);
        assert!(transport.gain < 1.4 && transport.gain > 0.8);
    }

    #[test]
    fn test_first_interaction_announces_opening_line() {
        let mut scene = scene();
        let mut transport = FakeTransport::default();
        let mut voice = LogVoice::new();

        assert_eq!(
            scene.interact(0.0, &mut transport, &mut voice),
            Interaction::Started
        );
        assert_eq!(
            scene.overlay().newest_line(),
            Some("The river remembers what it carries.")
        );
        assert_eq!(voice.spoken(), 1);
        assert_eq!(scene.overlay().ripples().len(), 1);
    }

    #[test]
    fn test_draw_order() {
        let mut scene = scene();
        let mut transport = FakeTransport::default();
        let mut voice = LogVoice::new();
        scene.tick(input(&[], 0.0, 0), &mut transport, &mut voice);

        let mut canvas = DrawList::new(BOUNDS.x, BOUNDS.y);
        scene.draw(&mut canvas);

        let commands = &canvas.commands;
        assert!(matches!(
            commands.first(),
            Some(DrawCommand::Rect { color, .. }) if color.a == 15
        ));
        assert!(matches!(commands[1], DrawCommand::Polygon { .. }));
        assert!(matches!(commands[6], DrawCommand::Circle { .. }));
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Text { text, color, .. }) if text == INTRO_TEXT && color.a == 153
        ));
    }
}
