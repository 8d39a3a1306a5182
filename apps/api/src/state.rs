use std::sync::Arc;

use fontdue::Font;

use crate::comic::ComicSource;
use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::weather::OpenWeatherClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shared HTTP client for wttr.in downloads.
    pub fetcher: HttpFetcher,
    /// Caption font, parsed once at startup and sized per request.
    pub font: Arc<Font>,
    pub comics: Arc<dyn ComicSource>,
    /// `None` when no OpenWeatherMap key is configured; the card endpoint then answers 503.
    pub weather: Option<OpenWeatherClient>,
}
