//! Comic frame composition.
//!
//! Canvas layout (W×H, white background):
//! ```text
//! ┌──────────────────────────────┐
//! │        comic, centred        │
//! │   in H - comic_bottom_margin │
//! ├──────────────────────┬───────┤
//! │ caption (alt text)   │  QR   │
//! │                      ├───────┤
//! │                      │ site  │
//! └──────────────────────┴───────┘
//! ```
//! CPU-bound; run inside `tokio::task::spawn_blocking`.

use image::imageops::FilterType;
use image::RgbImage;
use tracing::debug;

use crate::comic::source::{comic_page_url, ComicMetadata, ATTRIBUTION};
use crate::config::ComposeSettings;
use crate::errors::AppError;
use crate::layout::{
    fit_image, FontMetrics, HorizontalAlign, LayoutRequest, Rect, SizedFont, VerticalAlign,
};
use crate::render::{decode_image, generate_qr, resize_exact, Canvas, BLACK, WHITE};

/// Positions of the footer elements for a given canvas and QR size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterLayout {
    pub qr_x: i32,
    pub qr_y: i32,
    /// Left of the QR code, same height as the QR code.
    pub caption: Rect,
    /// Directly below the QR code, same width as the QR code.
    pub attribution: Rect,
}

/// Places the QR code in the bottom-right corner and the text areas around it.
pub fn footer_layout(
    width: u32,
    height: u32,
    qr_width: u32,
    qr_height: u32,
    settings: &ComposeSettings,
) -> FooterLayout {
    let (width, height) = (width as i32, height as i32);
    let (qr_width, qr_height) = (qr_width as i32, qr_height as i32);
    let margin = settings.footer_margin;

    let qr_x = width - qr_width - margin;
    let qr_y = height - qr_height - margin - settings.qr_bottom_offset;

    let caption_x = margin;
    let caption_width = qr_x - margin - caption_x;

    FooterLayout {
        qr_x,
        qr_y,
        caption: Rect::from_origin(caption_x, qr_y, caption_width, qr_height),
        attribution: Rect::new(
            qr_x,
            qr_y + qr_height,
            qr_x + qr_width,
            qr_y + qr_height + settings.qr_bottom_offset,
        ),
    }
}

/// What the QR code encodes: the comic page URL with a trailing slash.
pub fn qr_payload(metadata: &ComicMetadata) -> String {
    format!("{}/", comic_page_url(metadata.number))
}

/// Composes the comic, QR code, caption and attribution onto a fresh canvas.
pub fn compose_comic(
    comic: &RgbImage,
    metadata: &ComicMetadata,
    font: &SizedFont,
    settings: &ComposeSettings,
    width: u32,
    height: u32,
) -> Result<Canvas, AppError> {
    let mut canvas = Canvas::new(width, height, WHITE);

    let placement = fit_image(
        comic.width(),
        comic.height(),
        width,
        height,
        settings.comic_bottom_margin,
    );
    if (placement.width, placement.height) != comic.dimensions() {
        let resized = resize_exact(comic, placement.width, placement.height, FilterType::CatmullRom);
        canvas.paste(&resized, placement.x, placement.y);
    } else {
        canvas.paste(comic, placement.x, placement.y);
    }

    let qr = generate_qr(&qr_payload(metadata), settings.qr_box_size, settings.qr_border)?;
    let footer = footer_layout(width, height, qr.width(), qr.height(), settings);
    canvas.paste(&qr, footer.qr_x, footer.qr_y);

    let caption_font = font.at_size(settings.font_size);
    if !metadata.alt.is_empty() {
        draw_footer_text(&mut canvas, &metadata.alt, &caption_font, footer.caption, settings);
    }
    draw_footer_text(&mut canvas, ATTRIBUTION, &caption_font, footer.attribution, settings);

    Ok(canvas)
}

/// Decodes the downloaded comic, composes the frame and encodes it as JPEG.
pub fn render_comic_jpeg(
    comic_bytes: &[u8],
    metadata: &ComicMetadata,
    font: &SizedFont,
    settings: &ComposeSettings,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, AppError> {
    let comic = decode_image(comic_bytes)?;
    debug!(
        number = metadata.number,
        "Decoded comic {}x{}",
        comic.width(),
        comic.height()
    );

    let canvas = compose_comic(&comic, metadata, font, settings, width, height)?;
    Ok(canvas.encode_jpeg(settings.jpeg_quality)?)
}

fn draw_footer_text(
    canvas: &mut Canvas,
    text: &str,
    font: &SizedFont,
    rect: Rect,
    settings: &ComposeSettings,
) {
    if !rect.is_usable() {
        debug!(?rect, "No room for footer text on this canvas");
        return;
    }
    let request = LayoutRequest {
        text,
        font,
        color: BLACK,
        rect,
        h_align: HorizontalAlign::Left,
        v_align: VerticalAlign::Top,
        line_spacing: settings.line_spacing,
    };
    canvas.draw_text_in_rect(&request);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::fixture_font;

    fn metadata() -> ComicMetadata {
        ComicMetadata {
            number: 353,
            title: "I brought you a spoon. For the feelings.".into(),
            alt: "I brought you a spoon. For the feelings.".into(),
            url: comic_page_url(353),
            image_url: "https://www.asofterworld.com/clean/spoon.jpg".into(),
        }
    }

    fn comic() -> RgbImage {
        RgbImage::from_pixel(300, 100, image::Rgb([40, 40, 40]))
    }

    #[test]
    fn test_qr_payload_has_trailing_slash() {
        assert_eq!(
            qr_payload(&metadata()),
            "https://www.asofterworld.com/index.php?id=353/"
        );
    }

    #[test]
    fn test_compose_default_canvas_places_comic_and_footer() {
        let settings = ComposeSettings::default();
        let canvas =
            compose_comic(&comic(), &metadata(), &fixture_font(18), &settings, 600, 448).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (600, 448));

        // 300x100 scales by 2 to 600x200 at y = (348 - 200) / 2 = 74.
        assert_eq!(*canvas.image().get_pixel(300, 73), WHITE);
        assert_ne!(*canvas.image().get_pixel(300, 74), WHITE);
        assert_ne!(*canvas.image().get_pixel(300, 273), WHITE);
        assert_eq!(*canvas.image().get_pixel(300, 274), WHITE);

        // The caption draws something left of the QR code.
        let footer = footer_layout(600, 448, 74, 74, &settings);
        let caption_ink = (footer.caption.left..footer.caption.right).any(|x| {
            (footer.caption.top..footer.caption.bottom)
                .any(|y| *canvas.image().get_pixel(x as u32, y as u32) != WHITE)
        });
        assert!(caption_ink);
    }

    #[test]
    fn test_compose_survives_tiny_canvases() {
        let settings = ComposeSettings::default();
        let font = fixture_font(18);
        for (width, height) in [(1, 1), (600, 50), (50, 600)] {
            let canvas = compose_comic(&comic(), &metadata(), &font, &settings, width, height)
                .unwrap_or_else(|e| panic!("{width}x{height}: {e}"));
            assert_eq!((canvas.width(), canvas.height()), (width, height));
        }
    }

    #[test]
    fn test_render_comic_jpeg_from_png_bytes() {
        let mut png = std::io::Cursor::new(Vec::new());
        comic().write_to(&mut png, image::ImageFormat::Png).unwrap();

        let settings = ComposeSettings::default();
        let jpeg = render_comic_jpeg(
            png.get_ref(),
            &metadata(),
            &fixture_font(18),
            &settings,
            320,
            240,
        )
        .unwrap();
        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }

    #[test]
    fn test_render_comic_jpeg_rejects_garbage() {
        let err = render_comic_jpeg(
            b"not an image",
            &metadata(),
            &fixture_font(18),
            &ComposeSettings::default(),
            600,
            448,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Image(_)));
    }

    #[test]
    fn test_footer_layout_default_canvas() {
        let settings = ComposeSettings::default();
        // A version-4 QR at box size 2 with a 2-module border is 74px square.
        let footer = footer_layout(600, 448, 74, 74, &settings);

        assert_eq!(footer.qr_x, 600 - 74 - 10);
        assert_eq!(footer.qr_y, 448 - 74 - 10 - 20);
        assert_eq!(footer.caption, Rect::new(10, 344, 506, 418));
        assert_eq!(footer.attribution, Rect::new(516, 418, 590, 438));
    }

    #[test]
    fn test_footer_caption_sits_beside_qr() {
        let settings = ComposeSettings::default();
        let footer = footer_layout(800, 600, 50, 50, &settings);

        assert_eq!(footer.caption.top, footer.qr_y);
        assert_eq!(footer.caption.height(), 50);
        assert_eq!(footer.caption.right + settings.footer_margin, footer.qr_x);
    }

    #[test]
    fn test_footer_on_tiny_canvas_has_unusable_caption() {
        let settings = ComposeSettings::default();
        let footer = footer_layout(60, 60, 50, 50, &settings);
        assert!(!footer.caption.is_usable());
    }
}
