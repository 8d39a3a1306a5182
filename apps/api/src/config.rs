use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// TrueType font used for captions and the weather card.
    pub font_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Enables the OpenWeatherMap weather card.
    pub openweathermap_api_key: Option<String>,
    /// When set, generated comics are also written here.
    pub output_dir: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub compose: ComposeSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            font_path: PathBuf::from(require_env("FONT_PATH")?),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openweathermap_api_key: optional_env("OPENWEATHERMAP_API_KEY"),
            output_dir: optional_env("OUTPUT_DIR").map(PathBuf::from),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 30)
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            compose: ComposeSettings::default(),
        })
    }
}

/// Canvas and footer geometry for composed comic images.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeSettings {
    pub default_width: u32,
    pub default_height: u32,
    /// Largest width or height a caller may request.
    pub max_dimension: u32,
    pub footer_margin: i32,
    /// Band kept free below the comic for the caption and QR code.
    pub comic_bottom_margin: u32,
    pub qr_box_size: u32,
    pub qr_border: u32,
    /// Space under the QR code for the site attribution.
    pub qr_bottom_offset: i32,
    pub font_size: u32,
    pub line_spacing: f64,
    pub jpeg_quality: u8,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            default_width: 600,
            default_height: 448,
            max_dimension: 4096,
            footer_margin: 10,
            comic_bottom_margin: 100,
            qr_box_size: 2,
            qr_border: 2,
            qr_bottom_offset: 20,
            font_size: 18,
            line_spacing: 1.1,
            jpeg_quality: 95,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
