use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Handle to a font inside a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Loaded fonts. Immutable once loaded; the text renderer rasterises from
/// here on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType/OpenType font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("no font data".to_string()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Size of `text` laid out on one line, in logical pixels.
    ///
    /// Unknown fonts measure as zero width with a nominal line height, so
    /// callers can still position things.
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        let line_height = size * 1.2;
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, line_height);
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        // Pen position after the last glyph, not its bitmap edge.
        let width = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                g.x - m.xmin as f32 + m.advance_width
            })
            .fold(0.0f32, f32::max);

        Vec2::new(width, layout.height().max(line_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytes_rejected() {
        let mut fs = FontSystem::new();
        assert!(fs.load_font(&[]).is_err());
    }

    #[test]
    fn garbage_bytes_rejected() {
        let mut fs = FontSystem::new();
        assert!(fs.load_font(b"definitely not a font").is_err());
    }

    #[test]
    fn unknown_font_measures_nominal_height() {
        let fs = FontSystem::new();
        let m = fs.measure_text("Then", FontId(3), 10.0);
        assert_eq!(m.x, 0.0);
        assert!((m.y - 12.0).abs() < 1e-6);
    }
}
