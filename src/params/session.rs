//! Session and playback crossfade parameters.

use serde::Deserialize;

/// Crossfade timing, bed levels and intro fade
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Fade duration for both beds (milliseconds)
    pub fade_ms: f64,

    /// Delay after a fade-out before the beds pause (milliseconds)
    pub pause_grace_ms: f64,

    /// River bed target volume
    pub river_volume: f32,

    /// Ocean bed target volume
    pub ocean_volume: f32,

    /// Intro text alpha lost per frame once started (0-255)
    pub intro_decay: f32,

    /// Time for the transport gain to cover its full range (milliseconds)
    pub gain_ramp_ms: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            fade_ms: 3000.0,
            pause_grace_ms: 200.0,
            river_volume: 0.8,
            ocean_volume: 0.4,
            intro_decay: 6.0,
            gain_ramp_ms: 250.0,
        }
    }
}
