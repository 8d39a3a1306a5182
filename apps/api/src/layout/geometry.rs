//! Pixel rectangles and image placement on a canvas.

use serde::Serialize;
use tracing::debug;

/// Axis-aligned rectangle in pixel coordinates. Edges are exclusive on the
/// right and bottom; `width`/`height` may be zero or negative for degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a rectangle from its top-left corner and size.
    pub const fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle has positive area.
    pub const fn is_usable(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Where and how large an image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImagePlacement {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

/// Scales an image to fit inside the canvas minus a reserved bottom band, keeping
/// the aspect ratio, and centres it in the remaining area.
///
/// The scale may be above 1.0: small images are enlarged to fill the space.
/// Sizes and offsets are truncated to whole pixels.
pub fn fit_image(
    original_width: u32,
    original_height: u32,
    canvas_width: u32,
    canvas_height: u32,
    bottom_margin: u32,
) -> ImagePlacement {
    let available_height = f64::from(canvas_height) - f64::from(bottom_margin);

    let width_ratio = f64::from(canvas_width) / f64::from(original_width.max(1));
    let height_ratio = available_height / f64::from(original_height.max(1));
    let scale = width_ratio.min(height_ratio).max(0.0);

    let width = (f64::from(original_width) * scale) as u32;
    let height = (f64::from(original_height) * scale) as u32;
    let x = ((f64::from(canvas_width) - f64::from(width)) / 2.0) as i32;
    let y = ((available_height - f64::from(height)) / 2.0) as i32;

    debug!(
        original = %format!("{original_width}x{original_height}"),
        canvas = %format!("{canvas_width}x{canvas_height}"),
        width_ratio,
        height_ratio,
        "Image scaled to {width}x{height} at ({x}, {y})"
    );

    ImagePlacement {
        width,
        height,
        x,
        y,
    }
}
