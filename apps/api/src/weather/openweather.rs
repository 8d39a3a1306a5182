//! OpenWeatherMap client: zipcode geocoding and the One Call forecast.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::fetch::HttpFetcher;

const GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/zip";
const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

// ────────────────────────────────────────────────────────────────────────────
// Response models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyWeather {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemperature {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyWeather {
    pub dt: i64,
    pub temp: DailyTemperature,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// The parts of a One Call response the weather card draws.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    pub current: CurrentWeather,
    #[serde(default)]
    pub hourly: Vec<HourlyWeather>,
    #[serde(default)]
    pub daily: Vec<DailyWeather>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OpenWeatherClient {
    fetcher: HttpFetcher,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(fetcher: HttpFetcher, api_key: String) -> Self {
        Self { fetcher, api_key }
    }

    /// Resolves a US zipcode to coordinates.
    pub async fn locate_zip(&self, zipcode: &str) -> Result<GeoLocation, AppError> {
        let query = [
            ("zip", format!("{zipcode},US")),
            ("appid", self.api_key.clone()),
        ];
        let location: GeoLocation = self.fetcher.fetch_json(GEOCODING_URL, &query).await?;
        info!(zipcode, lat = location.lat, lon = location.lon, "Geocoded zipcode");
        Ok(location)
    }

    /// Current, hourly and daily forecast in imperial units.
    pub async fn one_call(&self, lat: f64, lon: f64) -> Result<OneCallResponse, AppError> {
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("exclude", "minutely,alerts".to_string()),
            ("appid", self.api_key.clone()),
            ("units", "imperial".to_string()),
        ];
        Ok(self.fetcher.fetch_json(ONE_CALL_URL, &query).await?)
    }
}
