//! QR code rasterisation.

use image::RgbImage;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

use crate::render::canvas::{BLACK, WHITE};

#[derive(Debug, Error)]
pub enum QrError {
    #[error("Could not encode QR data: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Renders `data` as a QR code: the smallest version that fits at error
/// correction level M, `box_size` pixels per module and a quiet zone of
/// `border` modules.
pub fn generate_qr(data: &str, box_size: u32, border: u32) -> Result<RgbImage, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;
    let modules = code.width() as u32;
    let side = (modules + 2 * border) * box_size;

    let mut image = RgbImage::from_pixel(side, side, WHITE);
    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let col = index as u32 % modules;
        let row = index as u32 / modules;
        let x0 = (col + border) * box_size;
        let y0 = (row + border) * box_size;
        for y in y0..y0 + box_size {
            for x in x0..x0 + box_size {
                image.put_pixel(x, y, BLACK);
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_uses_version_one() {
        // Version 1 is 21 modules; 21 + 2*2 border = 25 modules at 2px each.
        let qr = generate_qr("hello", 2, 2).unwrap();
        assert_eq!((qr.width(), qr.height()), (50, 50));
    }

    #[test]
    fn test_quiet_zone_is_white_and_finder_pattern_is_dark() {
        let qr = generate_qr("hello", 2, 2).unwrap();
        assert_eq!(*qr.get_pixel(0, 0), WHITE);
        assert_eq!(*qr.get_pixel(3, 3), WHITE);
        // Top-left finder pattern starts right after the border.
        assert_eq!(*qr.get_pixel(4, 4), BLACK);
        assert_eq!(*qr.get_pixel(5, 5), BLACK);
    }

    #[test]
    fn test_longer_urls_grow_the_symbol() {
        let short = generate_qr("hi", 2, 2).unwrap();
        let long = generate_qr("https://www.asofterworld.com/index.php?id=1242", 2, 2).unwrap();
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_box_size_scales_output() {
        let small = generate_qr("hello", 1, 0).unwrap();
        let large = generate_qr("hello", 4, 0).unwrap();
        assert_eq!(small.width(), 21);
        assert_eq!(large.width(), 84);
    }
}
