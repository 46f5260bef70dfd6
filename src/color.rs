//! Plain RGBA color values and pure blend helpers.

/// 8-bit RGBA color, alpha 0 = transparent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from an RGB triple
    pub const fn rgb(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], 255)
    }

    /// Same color with alpha taken from a float, clamped to [0, 255]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 255.0).round() as u8,
            ..self
        }
    }

    /// Alpha on a 0-100 scale converted to 0-255
    pub fn with_alpha_percent(self, percent: f32) -> Self {
        self.with_alpha(percent * 2.55)
    }

    /// Channel-wise linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Source-over composite of `self` onto an opaque-or-not destination pixel
    pub fn blend_over(self, dst: [u8; 4]) -> [u8; 4] {
        let sa = self.a as f32 / 255.0;
        if sa <= 0.0 {
            return dst;
        }
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| {
            let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        [
            channel(self.r, dst[0]),
            channel(self.g, dst[1]),
            channel(self.b, dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}
