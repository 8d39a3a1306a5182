use axum::Json;
use serde_json::{json, Value};

const ENDPOINTS: &[&str] = &[
    "/comic",
    "/comic/:number",
    "/comic/info/:number",
    "/weather/:zipcode",
    "/weather/:zipcode/current",
    "/weather/:zipcode/today",
    "/weather/:zipcode/forecast",
    "/weather/:zipcode/card",
];

/// GET / and GET /health
/// Service status, version and the image endpoints it serves.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ENDPOINTS,
    }))
}
