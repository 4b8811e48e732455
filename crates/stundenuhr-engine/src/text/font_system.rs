use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Vertical metrics of one line at a given pixel size.
///
/// `ascent` is positive (above the baseline), `descent` is negative
/// (below it), both in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to the text renderer each frame so new glyphs can be
/// rasterized on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// Returns the `FontId` that identifies the font in draw commands.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("empty font data".to_string()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?} ({} glyphs)", id, self.fonts[id.0].glyph_count());
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Ascent/descent of a line at `size`.
    ///
    /// Falls back to an 80/20 split of `size` if the font has no horizontal
    /// metrics or `id` is unknown.
    #[must_use]
    pub fn line_metrics(&self, id: FontId, size: f32) -> LineMetrics {
        self.get(id)
            .and_then(|f| f.horizontal_line_metrics(size))
            .map(|m| LineMetrics { ascent: m.ascent, descent: m.descent })
            .unwrap_or(LineMetrics { ascent: size * 0.8, descent: -size * 0.2 })
    }

    /// Total advance width of a single line of `text` at `size`.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> f32 {
        let Some(font) = self.get(id) else {
            return 0.0;
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        // Pen position after each glyph (= g.x - xmin + advance) rather than
        // the bitmap right edge, so the result is independent of side bearings.
        layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
