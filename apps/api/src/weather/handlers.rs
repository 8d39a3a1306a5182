//! Axum route handlers for the Weather API.

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::SizedFont;
use crate::routes::response::{jpeg_response, DimensionsQuery};
use crate::state::AppState;
use crate::weather::card::{
    render_weather_card, CARD_JPEG_QUALITY, DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH,
};
use crate::weather::wttr::{fetch_wttr_png, render_wttr_jpeg, validate_location, ViewOption};

// ────────────────────────────────────────────────────────────────────────────
// Query types
// ────────────────────────────────────────────────────────────────────────────

/// `?view=&frame=&width=&height=` on the wttr.in endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub view: Option<String>,
    pub frame: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl WeatherQuery {
    /// Defaults to current conditions.
    pub fn view(&self) -> Result<ViewOption, AppError> {
        self.view.as_deref().unwrap_or("0").parse()
    }

    /// Framed unless `frame` is given and is not `true` (case-insensitive).
    pub fn frame(&self) -> bool {
        self.frame
            .as_deref()
            .map_or(true, |f| f.eq_ignore_ascii_case("true"))
    }

    fn dimensions(&self) -> DimensionsQuery {
        DimensionsQuery {
            width: self.width,
            height: self.height,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /weather/:zipcode
pub async fn handle_weather(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Response, AppError> {
    let view = query.view()?;
    let filename = format!("weather_{zipcode}_view{}.jpg", view.code());
    wttr_image(&state, &zipcode, view, &query, &filename).await
}

/// GET /weather/:zipcode/current
pub async fn handle_current(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Response, AppError> {
    wttr_view(&state, &zipcode, ViewOption::Current, &query).await
}

/// GET /weather/:zipcode/today
pub async fn handle_today(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Response, AppError> {
    wttr_view(&state, &zipcode, ViewOption::Today, &query).await
}

/// GET /weather/:zipcode/forecast
pub async fn handle_forecast(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Response, AppError> {
    wttr_view(&state, &zipcode, ViewOption::Forecast, &query).await
}

/// GET /weather/:zipcode/card
///
/// Needs `OPENWEATHERMAP_API_KEY`; answers 503 without it.
pub async fn handle_weather_card(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
    Query(dims): Query<DimensionsQuery>,
) -> Result<Response, AppError> {
    let client = state.weather.as_ref().ok_or_else(|| {
        AppError::NotConfigured("OPENWEATHERMAP_API_KEY is not set".to_string())
    })?;
    validate_location(&zipcode)?;
    let (width, height) = dims.resolve(
        DEFAULT_CARD_WIDTH,
        DEFAULT_CARD_HEIGHT,
        state.config.compose.max_dimension,
    )?;

    let location = client.locate_zip(&zipcode).await?;
    let forecast = client.one_call(location.lat, location.lon).await?;
    let label = location.name.unwrap_or_else(|| zipcode.clone());

    let font = SizedFont::new(state.font.clone(), state.config.compose.font_size);
    let jpeg = tokio::task::spawn_blocking(move || {
        render_weather_card(&label, &forecast, &font, width, height)
            .encode_jpeg(CARD_JPEG_QUALITY)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in weather card: {e}")))??;

    info!(zipcode = %zipcode, width, height, bytes = jpeg.len(), "Generated weather card");
    Ok(jpeg_response(jpeg, &format!("weather_{zipcode}_card.jpg")))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn wttr_view(
    state: &AppState,
    zipcode: &str,
    view: ViewOption,
    query: &WeatherQuery,
) -> Result<Response, AppError> {
    let filename = format!("weather_{zipcode}_{}.jpg", view.slug());
    wttr_image(state, zipcode, view, query, &filename).await
}

async fn wttr_image(
    state: &AppState,
    zipcode: &str,
    view: ViewOption,
    query: &WeatherQuery,
    filename: &str,
) -> Result<Response, AppError> {
    let size = query.dimensions().exact(state.config.compose.max_dimension)?;
    let png = fetch_wttr_png(&state.fetcher, zipcode, view, query.frame()).await?;

    let jpeg = tokio::task::spawn_blocking(move || render_wttr_jpeg(&png, size))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in weather image: {e}")))??;

    info!(zipcode, view = view.slug(), bytes = jpeg.len(), "Generated weather image");
    Ok(jpeg_response(jpeg, filename))
}
