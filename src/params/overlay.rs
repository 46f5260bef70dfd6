//! Text/speech overlay configuration.

use serde::Deserialize;

/// When the overlay scheduler fires
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// Every `interval_ms`
    Fixed { interval_ms: f64 },

    /// After a delay drawn uniformly from [min_ms, max_ms] per trigger
    Randomized { min_ms: f64, max_ms: f64 },

    /// After `interval_ms`, once per frame with probability
    /// map(level, 0, level_ceiling, p_low, p_high)
    AmplitudeGated {
        interval_ms: f64,
        p_low: f64,
        p_high: f64,
        level_ceiling: f32,
    },
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::Fixed {
            interval_ms: 10_000.0,
        }
    }
}

/// Which line generator the overlay uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TextStrategy {
    /// Uniform draw from the loaded corpus
    Corpus,

    /// Sentences sampled from an n-gram model of the corpus
    #[default]
    Markov,

    /// Built-in lines only
    Fallback,
}

/// Speech collaborator settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 1.0,
            volume: 0.6,
        }
    }
}

/// Transient ring spawned when a voice line starts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RippleParams {
    /// Radius growth per frame (pixels)
    pub growth: f32,

    /// Alpha lost per frame (0-255)
    pub fade: f32,

    /// Alpha at spawn (0-255)
    pub start_alpha: f32,

    /// Ring stroke width (pixels)
    pub stroke: f32,

    /// Largest number of live ripples
    pub max_alive: usize,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            growth: 2.5,
            fade: 3.0,
            start_alpha: 180.0,
            stroke: 1.5,
            max_alive: 8,
        }
    }
}

/// Overlay line lifecycle, placement and generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    pub trigger: TriggerPolicy,
    pub strategy: TextStrategy,

    /// Largest number of coexisting lines
    pub max_lines: usize,

    /// Alpha gained per frame while fading in
    pub fade_in_step: f32,

    /// Frames a line stays fully visible
    pub hold_frames: u32,

    /// Alpha lost per frame while fading out
    pub fade_out_step: f32,

    /// Alpha at which fade-in completes (0-255)
    pub alpha_ceiling: f32,

    /// Horizontal placement band as canvas-width fractions
    pub safe_x: (f32, f32),

    /// Vertical placement band as canvas-height fractions
    pub safe_y: (f32, f32),

    /// Text size (pixels)
    pub text_size: f32,

    /// Markov model order (tokens of context + 1)
    pub markov_order: usize,

    /// Shortest accepted generated sentence (tokens)
    pub markov_min_tokens: usize,

    /// Longest generated sentence before giving up (tokens)
    pub markov_max_tokens: usize,

    /// Generation attempts per trigger
    pub markov_attempts: usize,

    /// Line spoken on the first interaction
    pub opening_line: String,

    /// Text color endpoints blended by hue drift
    pub drift_colors: ([u8; 3], [u8; 3]),

    pub voice: VoiceSettings,
    pub ripple: RippleParams,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            trigger: TriggerPolicy::default(),
            strategy: TextStrategy::default(),
            max_lines: 5,
            fade_in_step: 15.0,
            hold_frames: 120,
            fade_out_step: 3.0,
            alpha_ceiling: 255.0,
            safe_x: (0.2, 0.8),
            safe_y: (0.7, 0.9),
            text_size: 20.0,
            markov_order: 3,
            markov_min_tokens: 5,
            markov_max_tokens: 35,
            markov_attempts: 12,
            opening_line: "The river remembers what it carries.".to_string(),
            drift_colors: ([170, 225, 215], [195, 175, 240]), // teal to violet
            voice: VoiceSettings::default(),
            ripple: RippleParams::default(),
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.fade_in_step <= 0.0 || self.fade_out_step <= 0.0 {
            return Err("fade steps must be > 0".to_string());
        }
        if !(self.alpha_ceiling > 0.0 && self.alpha_ceiling <= 255.0) {
            return Err(format!(
                "alpha_ceiling must be in (0, 255], got {}",
                self.alpha_ceiling
            ));
        }
        if self.max_lines == 0 {
            return Err("max_lines must be at least 1".to_string());
        }
        if self.markov_order < 2 {
            return Err(format!(
                "markov_order must be at least 2, got {}",
                self.markov_order
            ));
        }
        match self.trigger {
            TriggerPolicy::Randomized { min_ms, max_ms } if min_ms > max_ms => {
                Err("randomized trigger needs min_ms <= max_ms".to_string())
            }
            TriggerPolicy::AmplitudeGated { level_ceiling, .. } if level_ceiling <= 0.0 => {
                Err("amplitude-gated trigger needs level_ceiling > 0".to_string())
            }
            TriggerPolicy::AmplitudeGated { p_low, p_high, .. }
                if !(0.0..=1.0).contains(&p_low) || !(0.0..=1.0).contains(&p_high) =>
            {
                Err("trigger probabilities must be in [0, 1]".to_string())
            }
            _ => Ok(()),
        }
    }
}
