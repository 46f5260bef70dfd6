//! Drawing surface collaborator.
//!
//! Components draw through the `Canvas` trait. `DrawList` records calls for
//! inspection, `Raster` paints them into an RGBA image.

mod raster;

pub use raster::Raster;

use glam::Vec2;

use crate::color::Rgba;

/// Shape, polyline and text sink with per-call fill color and alpha
pub trait Canvas {
    /// Current bounds (width, height) in pixels
    fn size(&self) -> (f32, f32);

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba);

    /// Fill a closed polygon (even-odd rule)
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    /// Centered text; surfaces without a glyph rasterizer may ignore it
    fn text(&mut self, text: &str, center: Vec2, size: f32, color: Rgba);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        origin: Vec2,
        extent: Vec2,
        color: Rgba,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Text {
        text: String,
        center: Vec2,
        size: f32,
        color: Rgba,
    },
}

/// Canvas that records every call in order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: f32,
    height: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Recorded polygons in draw order
    pub fn polygons(&self) -> impl Iterator<Item = (&[Vec2], Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polygon { points, color } => Some((points.as_slice(), *color)),
            _ => None,
        })
    }

    /// Recorded text in draw order
    pub fn texts(&self) -> impl Iterator<Item = (&str, Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect {
            origin,
            extent,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    fn text(&mut self, text: &str, center: Vec2, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            size,
            color,
        });
    }
}
