//! Weather card: a phone-weather-app style summary drawn from One Call data.
//!
//! Laid out for the default 400×600 canvas. Other sizes reuse the same vertical
//! positions and stretch horizontally.

use chrono::{DateTime, Utc};
use image::Rgb;

use crate::layout::{
    FontMetrics, HorizontalAlign, LayoutRequest, Rect, SizedFont, VerticalAlign,
};
use crate::render::Canvas;
use crate::weather::openweather::{Condition, OneCallResponse};

pub const DEFAULT_CARD_WIDTH: u32 = 400;
pub const DEFAULT_CARD_HEIGHT: u32 = 600;
pub const CARD_JPEG_QUALITY: u8 = 90;

const GRADIENT_TOP: [u8; 3] = [59, 130, 246];
const GRADIENT_BOTTOM: [u8; 3] = [30, 64, 175];

const TEXT_PRIMARY: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_SECONDARY: Rgb<u8> = Rgb([229, 231, 235]);
const TEXT_MUTED: Rgb<u8> = Rgb([156, 163, 175]);

const PANEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const PANEL_OPACITY: f32 = 25.0 / 255.0;
const PANEL_RADIUS: i32 = 15;
const PANEL_INSET: i32 = 20;

const HOURLY_TOP: i32 = 250;
const HOURLY_HEIGHT: i32 = 120;
const HOURLY_SLOTS: usize = 6;
const DAILY_TOP: i32 = 390;
const DAILY_HEIGHT: i32 = 200;
const DAILY_ROWS: usize = 7;
const DAILY_ROW_HEIGHT: i32 = 22;

struct CardFonts {
    large: SizedFont,
    medium: SizedFont,
    small: SizedFont,
}

/// Draws the full card for `location`.
pub fn render_weather_card(
    location: &str,
    data: &OneCallResponse,
    font: &SizedFont,
    width: u32,
    height: u32,
) -> Canvas {
    let fonts = CardFonts {
        large: font.at_size(72),
        medium: font.at_size(24),
        small: font.at_size(16),
    };

    let mut canvas = Canvas::new(width, height, Rgb(GRADIENT_TOP));
    canvas.fill_rows(|y| gradient_color(y, height));

    draw_summary(&mut canvas, location, data, &fonts);
    draw_hourly(&mut canvas, data, &fonts.small);
    draw_daily(&mut canvas, data, &fonts.small);
    canvas
}

fn draw_summary(canvas: &mut Canvas, location: &str, data: &OneCallResponse, fonts: &CardFonts) {
    let current = &data.current;
    let condition = current
        .weather
        .first()
        .map(|c| title_case(&c.description))
        .unwrap_or_default();

    // Long place names shrink rather than run off the card.
    let width = canvas.width() as i32;
    canvas.draw_text_in_rect(&LayoutRequest {
        text: location,
        font: &fonts.medium,
        color: TEXT_SECONDARY,
        rect: Rect::new(PANEL_INSET, 30, width - PANEL_INSET, 76),
        h_align: HorizontalAlign::Center,
        v_align: VerticalAlign::Center,
        line_spacing: 1.1,
    });
    draw_centered(canvas, &degrees(current.temp), &fonts.large, 80, TEXT_PRIMARY);
    draw_centered(canvas, &condition, &fonts.medium, 160, TEXT_SECONDARY);

    let feels_like = format!("Feels like {}", degrees(current.feels_like));
    draw_centered(canvas, &feels_like, &fonts.small, 190, TEXT_MUTED);

    if let Some(today) = data.daily.first() {
        let high_low = format!(
            "H:{} L:{}",
            degrees(today.temp.max),
            degrees(today.temp.min)
        );
        draw_centered(canvas, &high_low, &fonts.small, 210, TEXT_MUTED);
    }
}

fn draw_hourly(canvas: &mut Canvas, data: &OneCallResponse, font: &SizedFont) {
    let width = canvas.width() as i32;
    draw_panel(canvas, HOURLY_TOP, HOURLY_HEIGHT);
    canvas.draw_text(35, HOURLY_TOP + 15, "HOURLY FORECAST", TEXT_MUTED, font);

    let slot_width = (width - 60).div_euclid(HOURLY_SLOTS as i32);
    for (i, hour) in data.hourly.iter().take(HOURLY_SLOTS).enumerate() {
        let x = 35 + i as i32 * slot_width;
        let time = if i == 0 {
            "Now".to_string()
        } else {
            format_utc(hour.dt, "%H")
        };

        let rows = [
            (time.as_str(), 35, TEXT_SECONDARY),
            (icon_label(&hour.weather), 55, TEXT_PRIMARY),
            (&degrees(hour.temp), 85, TEXT_PRIMARY),
        ];
        for (text, offset, color) in rows {
            let text_x = x + (slot_width - font.measure(text)).div_euclid(2);
            canvas.draw_text(text_x, HOURLY_TOP + offset, text, color, font);
        }
    }
}

fn draw_daily(canvas: &mut Canvas, data: &OneCallResponse, font: &SizedFont) {
    let width = canvas.width() as i32;
    draw_panel(canvas, DAILY_TOP, DAILY_HEIGHT);
    canvas.draw_text(35, DAILY_TOP + 15, "7-DAY FORECAST", TEXT_MUTED, font);

    for (i, day) in data.daily.iter().take(DAILY_ROWS).enumerate() {
        let y = DAILY_TOP + 40 + i as i32 * DAILY_ROW_HEIGHT;
        let name = if i == 0 {
            "Today".to_string()
        } else {
            format_utc(day.dt, "%a")
        };
        canvas.draw_text(35, y, &name, TEXT_SECONDARY, font);
        canvas.draw_text(120, y, icon_label(&day.weather), TEXT_PRIMARY, font);

        // High and low are right-aligned to fixed columns.
        let high = degrees(day.temp.max);
        let low = degrees(day.temp.min);
        canvas.draw_text(width - 80 - font.measure(&high), y, &high, TEXT_PRIMARY, font);
        canvas.draw_text(width - 40 - font.measure(&low), y, &low, TEXT_MUTED, font);
    }
}

fn draw_panel(canvas: &mut Canvas, top: i32, height: i32) {
    let rect = Rect::new(
        PANEL_INSET,
        top,
        canvas.width() as i32 - PANEL_INSET,
        top + height,
    );
    canvas.fill_rounded_rect(rect, PANEL_RADIUS, PANEL_COLOR, PANEL_OPACITY);
}

fn draw_centered(canvas: &mut Canvas, text: &str, font: &SizedFont, y: i32, color: Rgb<u8>) {
    let x = (canvas.width() as i32 - font.measure(text)).div_euclid(2);
    canvas.draw_text(x, y, text, color, font);
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting helpers
// ────────────────────────────────────────────────────────────────────────────

/// Row colour of the background gradient.
pub fn gradient_color(y: u32, height: u32) -> Rgb<u8> {
    let ratio = f64::from(y) / f64::from(height.max(1));
    let mut channels = [0u8; 3];
    for (c, (top, bottom)) in channels
        .iter_mut()
        .zip(GRADIENT_TOP.iter().zip(GRADIENT_BOTTOM.iter()))
    {
        *c = (f64::from(*top) + (f64::from(*bottom) - f64::from(*top)) * ratio) as u8;
    }
    Rgb(channels)
}

/// Whole degrees, truncated toward zero.
pub fn degrees(temp: f64) -> String {
    format!("{}°", temp as i64)
}

/// "light rain" → "Light Rain".
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short label for an OpenWeatherMap icon code (`01d`, `10n`, ...).
pub fn icon_label(conditions: &[Condition]) -> &'static str {
    let icon = conditions.first().map(|c| c.icon.as_str()).unwrap_or("");
    match icon {
        "01d" => "Sunny",
        "01n" => "Clear",
        "02d" => "Fair",
        "02n" | "03d" | "03n" | "04d" | "04n" => "Cloudy",
        "09d" | "09n" | "10n" => "Rain",
        "10d" => "Showers",
        "11d" | "11n" => "Storm",
        "13d" | "13n" => "Snow",
        "50d" | "50n" => "Mist",
        _ => "Cloudy",
    }
}

fn format_utc(timestamp: i64, pattern: &str) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::fixture_font;

    fn forecast() -> OneCallResponse {
        serde_json::from_str(
            r#"{
                "current": {"temp": 61.3, "feels_like": 59.9,
                            "weather": [{"description": "light rain", "icon": "10d"}]},
                "hourly": [
                    {"dt": 1700000000, "temp": 61.0, "weather": [{"description": "x", "icon": "10d"}]},
                    {"dt": 1700003600, "temp": 60.0, "weather": [{"description": "x", "icon": "04d"}]}
                ],
                "daily": [
                    {"dt": 1700000000, "temp": {"min": 52.1, "max": 64.8},
                     "weather": [{"description": "x", "icon": "10d"}]},
                    {"dt": 1700086400, "temp": {"min": 50.0, "max": 63.0},
                     "weather": [{"description": "x", "icon": "01d"}]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_card_renders_at_default_size() {
        let canvas = render_weather_card(
            "San Francisco",
            &forecast(),
            &fixture_font(18),
            DEFAULT_CARD_WIDTH,
            DEFAULT_CARD_HEIGHT,
        );
        assert_eq!((canvas.width(), canvas.height()), (400, 600));
        assert_eq!(*canvas.image().get_pixel(0, 0), Rgb(GRADIENT_TOP));
        // The translucent hourly panel lightens the gradient behind it.
        let behind = gradient_color(300, 600);
        let panel = canvas.image().get_pixel(25, 300);
        assert!(panel.0[0] > behind.0[0]);
    }

    #[test]
    fn test_card_narrower_than_panel_insets_renders() {
        let canvas = render_weather_card("94110", &forecast(), &fixture_font(18), 30, 600);
        assert_eq!((canvas.width(), canvas.height()), (30, 600));
    }

    #[test]
    fn test_card_at_one_pixel_renders() {
        let canvas = render_weather_card("94110", &forecast(), &fixture_font(18), 1, 1);
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
    }

    fn condition(icon: &str) -> Vec<Condition> {
        vec![Condition {
            description: "x".into(),
            icon: icon.into(),
        }]
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_color(0, 600), Rgb(GRADIENT_TOP));
        // 59 + (30 - 59) * 0.5 = 44.5 → 44
        assert_eq!(gradient_color(300, 600), Rgb([44, 97, 210]));
    }

    #[test]
    fn test_degrees_truncates_toward_zero() {
        assert_eq!(degrees(61.9), "61°");
        assert_eq!(degrees(-3.7), "-3°");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_icon_labels() {
        assert_eq!(icon_label(&condition("01d")), "Sunny");
        assert_eq!(icon_label(&condition("10d")), "Showers");
        assert_eq!(icon_label(&condition("13n")), "Snow");
        assert_eq!(icon_label(&condition("99x")), "Cloudy");
        assert_eq!(icon_label(&[]), "Cloudy");
    }

    #[test]
    fn test_format_utc() {
        // 2023-11-14T22:13:20Z, a Tuesday.
        assert_eq!(format_utc(1_700_000_000, "%H"), "22");
        assert_eq!(format_utc(1_700_000_000, "%a"), "Tue");
    }
}
