mod comic;
mod config;
mod errors;
mod fetch;
mod layout;
mod render;
mod routes;
mod state;
mod weather;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comic::SofterWorldSource;
use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::layout::load_font;
use crate::routes::build_router;
use crate::state::AppState;
use crate::weather::OpenWeatherClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Softer World API v{}", env!("CARGO_PKG_VERSION"));

    // Caption font is required; there is no built-in fallback
    let font = load_font(&config.font_path)?;

    let fetcher = HttpFetcher::new(Duration::from_secs(config.http_timeout_secs))
        .context("building HTTP client")?;
    let comics = Arc::new(SofterWorldSource::new(fetcher.clone()));

    let weather = config
        .openweathermap_api_key
        .clone()
        .map(|key| OpenWeatherClient::new(fetcher.clone(), key));
    if weather.is_none() {
        info!("OPENWEATHERMAP_API_KEY not set, weather card endpoint disabled");
    }

    if let Some(dir) = &config.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        info!("Saving generated comics to {}", dir.display());
    }

    let state = AppState {
        config: config.clone(),
        fetcher,
        font,
        comics,
        weather,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
