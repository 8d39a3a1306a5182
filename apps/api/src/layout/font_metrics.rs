//! Font metrics capability used by the text fitting routine.
//!
//! `FontMetrics` is the seam between the layout math and a real font. A handle is
//! an immutable value bound to one point size; `at_size` hands back a *new*
//! handle instead of mutating the current one, so a single parsed font can be
//! shared across concurrent requests behind an `Arc`.
//!
//! Widths are integer pixels. `measure` reports the right edge of the inked
//! extent of a string (pen advance including kerning, plus the last glyph's
//! bitmap offset and width), which is what the wrap loop compares against the
//! rectangle width.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use thiserror::Error;
use tracing::info;

// ────────────────────────────────────────────────────────────────────────────
// Capability trait
// ────────────────────────────────────────────────────────────────────────────

/// A font bound to a point size.
pub trait FontMetrics: Sized {
    /// The point size this handle measures at.
    fn size(&self) -> u32;

    /// Returns a handle for the same font family at `size`. Never mutates `self`.
    fn at_size(&self, size: u32) -> Self;

    /// Pixel width of `text` rendered at this handle's size.
    fn measure(&self, text: &str) -> i32;
}

// ────────────────────────────────────────────────────────────────────────────
// Font loading
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Could not read font file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse font file {path}: {reason}")]
    Parse { path: String, reason: &'static str },
}

/// Reads and parses a TrueType/OpenType font from disk.
pub fn load_font(path: impl AsRef<Path>) -> Result<Arc<Font>, FontError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let font = parse_font(data).map_err(|reason| FontError::Parse {
        path: path.display().to_string(),
        reason,
    })?;

    info!(path = %path.display(), glyphs = font.glyph_count(), "Font loaded");
    Ok(font)
}

/// Parses font bytes already in memory.
pub fn parse_font(data: Vec<u8>) -> Result<Arc<Font>, &'static str> {
    Font::from_bytes(data, FontSettings::default()).map(Arc::new)
}

// ────────────────────────────────────────────────────────────────────────────
// fontdue-backed handle
// ────────────────────────────────────────────────────────────────────────────

/// A shared fontdue font at a specific pixel size.
#[derive(Clone)]
pub struct SizedFont {
    font: Arc<Font>,
    size: u32,
}

impl std::fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedFont")
            .field("glyphs", &self.font.glyph_count())
            .field("size", &self.size)
            .finish()
    }
}

/// A glyph placed on the pen line: the character and its pen x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub pen_x: f32,
}

impl SizedFont {
    pub fn new(font: Arc<Font>, size: u32) -> Self {
        Self { font, size }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn px(&self) -> f32 {
        self.size as f32
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.px())
            .map(|m| m.ascent)
            .unwrap_or(self.px())
    }

    /// Lays `text` out on a single pen line, applying kerning between pairs.
    ///
    /// Used by both `measure` and the canvas so measured and drawn extents agree.
    pub fn place_glyphs(&self, text: &str) -> Vec<PlacedGlyph> {
        let px = self.px();
        let mut pen = 0.0_f32;
        let mut prev: Option<char> = None;
        let mut placed = Vec::with_capacity(text.len());

        for ch in text.chars() {
            if let Some(p) = prev {
                pen += self.font.horizontal_kern(p, ch, px).unwrap_or(0.0);
            }
            placed.push(PlacedGlyph { ch, pen_x: pen });
            pen += self.font.metrics(ch, px).advance_width;
            prev = Some(ch);
        }
        placed
    }
}

impl FontMetrics for SizedFont {
    fn size(&self) -> u32 {
        self.size
    }

    fn at_size(&self, size: u32) -> Self {
        Self {
            font: Arc::clone(&self.font),
            size,
        }
    }

    fn measure(&self, text: &str) -> i32 {
        let px = self.px();
        let right = self
            .place_glyphs(text)
            .iter()
            .filter_map(|g| {
                let m = self.font.metrics(g.ch, px);
                (m.width > 0).then(|| g.pen_x + m.xmin as f32 + m.width as f32)
            })
            .fold(0.0_f32, f32::max);
        right.ceil() as i32
    }
}

/// DejaVu Sans Mono from `tests/fixtures`, for tests that need real glyphs.
#[cfg(test)]
pub(crate) fn fixture_font(size: u32) -> SizedFont {
    let data = include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf");
    SizedFont::new(parse_font(data.to_vec()).unwrap(), size)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_font_missing_file_is_io_error() {
        let err = load_font("/definitely/not/a/font.ttf").unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/a/font.ttf"));
    }

    #[test]
    fn test_load_font_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font at all").unwrap();

        let err = load_font(&path).unwrap_err();
        assert!(matches!(err, FontError::Parse { .. }));
    }

    #[test]
    fn test_measure_without_ink_is_zero() {
        let font = fixture_font(18);
        assert_eq!(font.measure(""), 0);
        assert_eq!(font.measure("   "), 0);
    }

    #[test]
    fn test_measure_grows_with_text() {
        let font = fixture_font(18);
        let short = font.measure("soft");
        let long = font.measure("softer world");
        assert!(short > 0);
        assert!(long > short);
        // Trailing spaces add advance but no ink.
        assert_eq!(font.measure("soft  "), short);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let small = fixture_font(10);
        let large = small.at_size(40);
        assert_eq!(large.size(), 40);
        assert_eq!(small.size(), 10);
        assert!(large.measure("weather") > 3 * small.measure("weather"));
    }

    #[test]
    fn test_place_glyphs_advances_monotonically() {
        let font = fixture_font(18);
        let glyphs = font.place_glyphs("AVA");
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0].pen_x, 0.0);
        assert!(glyphs[1].pen_x > 0.0);
        assert!(glyphs[2].pen_x > glyphs[1].pen_x);
    }

    #[test]
    fn test_ascent_is_within_line() {
        let font = fixture_font(20);
        assert!(font.ascent() > 0.0 && font.ascent() <= 20.0);
    }

    #[test]
    fn test_parse_font_rejects_empty_bytes() {
        assert!(parse_font(Vec::new()).is_err());
    }
}
