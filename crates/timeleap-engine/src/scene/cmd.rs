use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

/// Outline drawn on the inside edge of a shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Which way a triangle glyph points.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TriangleDir {
    Left,
    Right,
}

/// One overlay primitive in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: Color,
        /// Corner radius; `0.0` for sharp corners.
        radius: f32,
        border: Option<Border>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        border: Option<Border>,
    },
    /// Isosceles triangle filling `rect`, apex on the `dir` side.
    Triangle {
        rect: Rect,
        dir: TriangleDir,
        color: Color,
    },
    Text {
        text: String,
        font: FontId,
        size: f32,
        color: Color,
        /// Top-left of the first line.
        origin: Vec2,
    },
}

impl DrawCmd {
    /// Conservative bounds, used for culling against the clip rect.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawCmd::Rect { rect, .. } | DrawCmd::Triangle { rect, .. } => Some(*rect),
            DrawCmd::Circle { center, radius, .. } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            )),
            // Extent depends on the font; the text renderer clips per glyph.
            DrawCmd::Text { .. } => None,
        }
    }
}
