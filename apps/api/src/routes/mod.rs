pub mod health;
pub mod response;

use axum::{routing::get, Router};

use crate::comic::handlers as comic;
use crate::state::AppState;
use crate::weather::handlers as weather;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Comic API
        .route("/comic", get(comic::handle_random_comic))
        .route("/comic/:number", get(comic::handle_comic))
        .route("/comic/info/:number", get(comic::handle_comic_info))
        // Weather API
        .route("/weather/:zipcode", get(weather::handle_weather))
        .route("/weather/:zipcode/current", get(weather::handle_current))
        .route("/weather/:zipcode/today", get(weather::handle_today))
        .route("/weather/:zipcode/forecast", get(weather::handle_forecast))
        .route("/weather/:zipcode/card", get(weather::handle_weather_card))
        .with_state(state)
}
