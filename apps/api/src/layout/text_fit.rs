//! Auto-fitting text layout: shrink-and-wrap a string into a rectangle.
//!
//! # Algorithm
//! Starting at the requested size and stepping down one point at a time:
//! 1. `line_height = trunc(size * line_spacing)`, `max_lines = floor(rect_h / line_height)`.
//! 2. Greedy word wrap on single ASCII spaces. A line keeps taking words while
//!    `measure(line + " " + word) <= rect_w`. If not even the first word of a line
//!    fits, the size is rejected (words are never broken).
//! 3. Wrapping stops after `max_lines` lines. The size is accepted only when every
//!    word was placed.
//!
//! The first accepted size is positioned with the requested alignment. If no size
//! down to 1 fits, the result is `None`: callers skip the text, it is not an error.
//!
//! Positions are integer pixels. Fractional centre offsets are truncated toward
//! zero.

use image::Rgb;
use serde::Serialize;

use crate::layout::font_metrics::FontMetrics;
use crate::layout::geometry::Rect;

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
}

/// Everything needed to fit one string. `font` carries the starting size.
#[derive(Debug, Clone)]
pub struct LayoutRequest<'a, F> {
    pub text: &'a str,
    pub font: &'a F,
    pub color: Rgb<u8>,
    pub rect: Rect,
    pub h_align: HorizontalAlign,
    pub v_align: VerticalAlign,
    pub line_spacing: f64,
}

/// One wrapped line with its top-left position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
}

/// A successful fit: the lines, the font handle at the chosen size, and the
/// tight bounds actually covered.
///
/// `bounds` spans the drawn glyph extents horizontally but the full line boxes
/// vertically.
#[derive(Debug, Clone)]
pub struct TextLayout<F> {
    pub lines: Vec<PositionedLine>,
    pub font: F,
    pub line_height: i32,
    pub color: Rgb<u8>,
    pub bounds: Rect,
}

impl<F: FontMetrics> TextLayout<F> {
    /// The point size the text was fitted at.
    pub fn size(&self) -> u32 {
        self.font.size()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fitting
// ────────────────────────────────────────────────────────────────────────────

/// Fits `request.text` into `request.rect`, shrinking the font as needed.
///
/// Returns `None` when the text does not fit at any size from the requested one
/// down to 1, including when the rectangle has no positive area.
pub fn fit_text<F: FontMetrics>(request: &LayoutRequest<'_, F>) -> Option<TextLayout<F>> {
    let rect_width = request.rect.width();
    let rect_height = request.rect.height();

    let mut size = request.font.size();
    while size > 0 {
        let font = request.font.at_size(size);
        let line_height = (f64::from(size) * request.line_spacing) as i32;

        // A zero-height line box cannot be counted against the rectangle.
        if line_height > 0 {
            let max_lines = rect_height.div_euclid(line_height);
            if let Some(lines) = wrap_words(request.text, &font, rect_width, max_lines) {
                return Some(position_lines(request, font, lines, line_height));
            }
        }

        size -= 1;
    }

    None
}

/// Greedy wrap at a fixed size. `None` means this size does not fit.
fn wrap_words<F: FontMetrics>(
    text: &str,
    font: &F,
    max_width: i32,
    max_lines: i32,
) -> Option<Vec<String>> {
    let mut remaining = text.split(' ').peekable();
    let mut lines: Vec<String> = Vec::new();

    while (lines.len() as i32) < max_lines && remaining.peek().is_some() {
        let mut line: Option<String> = None;

        while let Some(word) = remaining.peek() {
            let candidate = match &line {
                Some(current) => format!("{current} {word}"),
                None => (*word).to_string(),
            };
            if font.measure(&candidate) > max_width {
                break;
            }
            line = Some(candidate);
            remaining.next();
        }

        match line {
            Some(line) => lines.push(line),
            // First word of the line is wider than the rectangle.
            None => break,
        }
    }

    let all_placed = remaining.peek().is_none();
    (all_placed && lines.len() as i32 <= max_lines).then_some(lines)
}

fn position_lines<F: FontMetrics>(
    request: &LayoutRequest<'_, F>,
    font: F,
    lines: Vec<String>,
    line_height: i32,
) -> TextLayout<F> {
    let rect = request.rect;
    let rect_width = f64::from(rect.width());
    let rect_height = f64::from(rect.height());
    let block_height = lines.len() as i32 * line_height;

    let start_y = match request.v_align {
        VerticalAlign::Top => rect.top,
        VerticalAlign::Center => {
            // The extra half-leading term pulls the block up toward the glyphs'
            // cap height rather than the middle of the line boxes.
            let leading = f64::from(line_height) - f64::from(font.size());
            (f64::from(rect.top) + rect_height / 2.0
                - f64::from(block_height) / 2.0
                - leading / 2.0) as i32
        }
    };

    let mut bounds = Rect::new(rect.right, start_y, rect.left, start_y + block_height);
    let mut positioned = Vec::with_capacity(lines.len());
    let mut y = start_y;

    for text in lines {
        let width = font.measure(&text);
        let x = match request.h_align {
            HorizontalAlign::Left => rect.left,
            HorizontalAlign::Center => {
                (f64::from(rect.left) + rect_width / 2.0 - f64::from(width) / 2.0) as i32
            }
        };

        bounds.left = bounds.left.min(x);
        bounds.right = bounds.right.max(x + width);

        positioned.push(PositionedLine { text, x, y, width });
        y += line_height;
    }

    TextLayout {
        lines: positioned,
        font,
        line_height,
        color: request.color,
        bounds,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
