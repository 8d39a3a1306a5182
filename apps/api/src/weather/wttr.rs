//! wttr.in PNG weather reports, re-served as JPEG.

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::fetch::HttpFetcher;
use crate::render::{decode_image, resize_exact, Canvas};

const WTTR_BASE: &str = "https://wttr.in";
/// Quality for re-encoded wttr.in images (the encoder's usual default).
pub const WTTR_JPEG_QUALITY: u8 = 75;

/// Which slice of the forecast wttr.in renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOption {
    /// Current conditions only ("0").
    Current,
    /// Current conditions and today ("1").
    Today,
    /// Today and tomorrow ("2").
    Forecast,
}

impl ViewOption {
    /// The digit wttr.in expects in the options segment.
    pub fn code(self) -> &'static str {
        match self {
            ViewOption::Current => "0",
            ViewOption::Today => "1",
            ViewOption::Forecast => "2",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ViewOption::Current => "current",
            ViewOption::Today => "today",
            ViewOption::Forecast => "forecast",
        }
    }
}

impl FromStr for ViewOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(ViewOption::Current),
            "1" => Ok(ViewOption::Today),
            "2" => Ok(ViewOption::Forecast),
            _ => Err(AppError::Validation(
                "Invalid view option. Use 0, 1, or 2".to_string(),
            )),
        }
    }
}

impl fmt::Display for ViewOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rejects locations that would change the shape of the wttr.in URL.
///
/// `_` separates the location from the options segment, so it is refused along
/// with path, query and fragment characters.
pub fn validate_location(location: &str) -> Result<(), AppError> {
    let ok = !location.is_empty()
        && location.len() <= 64
        && location
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '+' | ',' | '.'));
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid location {location:?}: use a zipcode or place name"
        )))
    }
}

/// `https://wttr.in/<location>_<view>q[p].png?m`: quiet (no "Weather report"
/// heading), optional frame, metric units.
pub fn wttr_url(location: &str, view: ViewOption, frame: bool) -> String {
    let frame = if frame { "p" } else { "" };
    format!("{WTTR_BASE}/{location}_{view}q{frame}.png?m")
}

/// Downloads the wttr.in PNG for `location`.
pub async fn fetch_wttr_png(
    fetcher: &HttpFetcher,
    location: &str,
    view: ViewOption,
    frame: bool,
) -> Result<bytes::Bytes, AppError> {
    validate_location(location)?;
    let url = wttr_url(location, view, frame);
    let png = fetcher.fetch_bytes(&url).await?;
    info!(location, view = view.slug(), "Fetched weather image");
    Ok(png)
}

/// Converts a wttr.in PNG to RGB JPEG, scaling only when a size is given.
pub fn render_wttr_jpeg(png: &[u8], size: Option<(u32, u32)>) -> Result<Vec<u8>, AppError> {
    let mut image = decode_image(png)?;
    debug!("Weather image is {}x{}", image.width(), image.height());

    if let Some((width, height)) = size {
        image = resize_exact(&image, width, height, FilterType::Lanczos3);
        debug!("Scaled weather image to {width}x{height}");
    }

    Ok(Canvas::from_image(image).encode_jpeg(WTTR_JPEG_QUALITY)?)
}
