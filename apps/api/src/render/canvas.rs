//! RGB drawing surface: paste rasters, draw fitted text, fill translucent
//! rounded rectangles, encode to JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageError, Rgb, RgbImage};
use tracing::debug;

use crate::layout::{fit_text, LayoutRequest, Rect, SizedFont, TextLayout};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Decodes PNG/JPEG/GIF/WebP bytes into an RGB raster. Alpha is discarded.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Resizes to exactly `width`×`height`, ignoring aspect ratio.
pub fn resize_exact(image: &RgbImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    imageops::resize(image, width, height, filter)
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[cfg(test)]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Copies `source` with its top-left at (x, y). Parts outside the canvas are clipped.
    pub fn paste(&mut self, source: &RgbImage, x: i32, y: i32) {
        imageops::replace(&mut self.image, source, i64::from(x), i64::from(y));
    }

    /// Draws one line of text. `y` is the top of the line; the baseline sits one
    /// ascent below it.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb<u8>, font: &SizedFont) {
        let px = font.px();
        let baseline = y as f32 + font.ascent();

        for glyph in font.place_glyphs(text) {
            let (metrics, coverage) = font.font().rasterize(glyph.ch, px);
            if metrics.width == 0 {
                continue;
            }
            let left = (x as f32 + glyph.pen_x).round() as i64 + i64::from(metrics.xmin);
            let top = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i64;

            for (row, line) in coverage.chunks(metrics.width).enumerate() {
                for (col, &alpha) in line.iter().enumerate() {
                    if alpha > 0 {
                        self.blend(
                            left + col as i64,
                            top + row as i64,
                            color,
                            f32::from(alpha) / 255.0,
                        );
                    }
                }
            }
        }
    }

    /// Draws every line of a fitted layout at its computed position.
    pub fn draw_layout(&mut self, layout: &TextLayout<SizedFont>) {
        for line in &layout.lines {
            self.draw_text(line.x, line.y, &line.text, layout.color, &layout.font);
        }
    }

    /// Fits `request` into its rectangle and draws it.
    ///
    /// Returns the bounds actually covered, or `None` when the text does not fit
    /// at any size; nothing is drawn in that case.
    pub fn draw_text_in_rect(&mut self, request: &LayoutRequest<'_, SizedFont>) -> Option<Rect> {
        let Some(layout) = fit_text(request) else {
            debug!(rect = ?request.rect, text = request.text, "Text does not fit, skipped");
            return None;
        };
        debug!(
            size = layout.size(),
            line_height = layout.line_height,
            lines = layout.lines.len(),
            "Text fitted"
        );
        self.draw_layout(&layout);
        Some(layout.bounds)
    }

    /// Fills `rect` with `color` at the given opacity, rounding the corners.
    /// Rectangles without positive area are ignored.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: i32, color: Rgb<u8>, opacity: f32) {
        if !rect.is_usable() {
            return;
        }
        let radius = radius.clamp(0, rect.width().min(rect.height()) / 2);
        let r = radius as f32;

        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                // Distance from the nearest corner centre, only inside the corner squares.
                let cx = if x < rect.left + radius {
                    Some((rect.left + radius) as f32 - (x as f32 + 0.5))
                } else if x >= rect.right - radius {
                    Some((x as f32 + 0.5) - (rect.right - radius) as f32)
                } else {
                    None
                };
                let cy = if y < rect.top + radius {
                    Some((rect.top + radius) as f32 - (y as f32 + 0.5))
                } else if y >= rect.bottom - radius {
                    Some((y as f32 + 0.5) - (rect.bottom - radius) as f32)
                } else {
                    None
                };
                if let (Some(dx), Some(dy)) = (cx, cy) {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                }
                self.blend(i64::from(x), i64::from(y), color, opacity);
            }
        }
    }

    /// Paints each row with its own colour.
    pub fn fill_rows(&mut self, mut color_for_row: impl FnMut(u32) -> Rgb<u8>) {
        for (y, row) in self.image.enumerate_rows_mut() {
            let color = color_for_row(y);
            for (_, _, pixel) in row {
                *pixel = color;
            }
        }
    }

    /// Encodes the canvas as a baseline JPEG.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ImageError> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality).encode(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(buf)
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in pixel.0.iter_mut().zip(color.0) {
            *dst = (f32::from(*dst) * (1.0 - alpha) + f32::from(src) * alpha).round() as u8;
        }
    }
}
