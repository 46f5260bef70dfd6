//! CPU canvas painting into an RGBA image with source-over blending.
//!
//! The image persists between frames, so a translucent full-canvas rect
//! leaves fading trails instead of clearing.

use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};

use super::Canvas;
use crate::color::Rgba;
use crate::error::Result;

/// Persistent RGBA frame buffer
///
/// There is no glyph rasterizer: `text` calls draw nothing, so overlay
/// lines and the intro prompt never reach the pixels. The window driver
/// mirrors the newest line into the title instead.
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Create an opaque black raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), Pixel([0, 0, 0, 255])),
        }
    }

    /// Replace the buffer with a black one of the new size
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save(&self, path: &str) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let pixel = self.image.get_pixel_mut(x, y);
        pixel.0 = color.blend_over(pixel.0);
    }

    /// Pixel index range whose centers fall in [lo, hi)
    fn covered(lo: f32, hi: f32, limit: u32) -> std::ops::Range<u32> {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().min(limit as f32);
        if start.is_nan() || start >= end {
            return 0..0;
        }
        start as u32..end as u32
    }

    /// Visit pixels within the bounding box of a disc of `reach` around `center`
    fn paint_near(&mut self, center: Vec2, reach: f32, color: Rgba, inside: impl Fn(f32) -> bool) {
        let (w, h) = self.image.dimensions();
        let xs = Self::covered(center.x - reach, center.x + reach + 1.0, w);
        let ys = Self::covered(center.y - reach, center.y + reach + 1.0, h);
        for py in ys {
            for px in xs.clone() {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5).distance(center);
                if inside(d) {
                    self.blend(px, py, color);
                }
            }
        }
    }
}

impl Canvas for Raster {
    fn size(&self) -> (f32, f32) {
        let (w, h) = self.image.dimensions();
        (w as f32, h as f32)
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let (w, h) = self.image.dimensions();
        let xs = Self::covered(origin.x, origin.x + extent.x, w);
        for py in Self::covered(origin.y, origin.y + extent.y, h) {
            for px in xs.clone() {
                self.blend(px, py, color);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        let (w, h) = self.image.dimensions();
        let (min_y, max_y) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        let mut crossings = Vec::with_capacity(8);
        for py in Self::covered(min_y, max_y + 1.0, h) {
            let yc = py as f32 + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                for px in Self::covered(span[0], span[1], w) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if color.a == 0 || radius <= 0.0 {
            return;
        }
        self.paint_near(center, radius, color, |d| d <= radius);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        if color.a == 0 || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        self.paint_near(center, radius + half, color, |d| (d - radius).abs() <= half);
    }

    fn text(&mut self, text: &str, _center: Vec2, _size: f32, _color: Rgba) {
        tracing::trace!(text, "raster skips text");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(raster: &Raster, x: u32, y: u32) -> [u8; 4] {
        raster.image().get_pixel(x, y).0
    }

    #[test]
    fn test_new_raster_is_black() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.size(), (4.0, 3.0));
        assert_eq!(pixel(&raster, 3, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fill_rect_covers_pixel_centers() {
        let mut raster = Raster::new(10, 10);
        raster.fill_rect(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0), Rgba::WHITE);
        assert_eq!(pixel(&raster, 2, 2), [255, 255, 255, 255]);
        assert_eq!(pixel(&raster, 4, 4), [255, 255, 255, 255]);
        assert_eq!(pixel(&raster, 5, 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&raster, 1, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut raster = Raster::new(20, 20);
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(0.0, 20.0),
        ];
        raster.fill_polygon(&tri, Rgba::WHITE);
        assert_eq!(pixel(&raster, 1, 1), [255, 255, 255, 255]);
        assert_eq!(pixel(&raster, 18, 18), [0, 0, 0, 255]);
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut raster = Raster::new(8, 8);
        raster.fill_circle(Vec2::new(-50.0, -50.0), 3.0, Rgba::WHITE);
        raster.fill_rect(Vec2::new(-100.0, 4.0), Vec2::new(1000.0, 100.0), Rgba::WHITE);
        raster.stroke_circle(Vec2::new(100.0, 100.0), 2.0, 1.0, Rgba::WHITE);
        assert_eq!(pixel(&raster, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&raster, 7, 7), [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_leaves_pixels_untouched() {
        let mut raster = Raster::new(16, 16);
        let before = raster.image().clone();
        raster.text("flood tide", Vec2::new(8.0, 8.0), 12.0, Rgba::WHITE);
        assert_eq!(raster.image(), &before);
    }

    #[test]
    fn test_translucent_rect_fades_toward_black() {
        let mut raster = Raster::new(2, 2);
        raster.fill_rect(Vec2::ZERO, Vec2::new(2.0, 2.0), Rgba::WHITE);
        for _ in 0..50 {
            raster.fill_rect(Vec2::ZERO, Vec2::new(2.0, 2.0), Rgba::BLACK.with_alpha(15.0));
        }
        assert!(pixel(&raster, 0, 0)[0] < 20);
    }
}
