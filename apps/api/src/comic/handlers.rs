//! Axum route handlers for the Comic API.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::comic::compose::render_comic_jpeg;
use crate::comic::output::{filename_suffix, save_comic};
use crate::comic::source::ComicMetadata;
use crate::errors::AppError;
use crate::layout::SizedFont;
use crate::routes::response::{jpeg_response, DimensionsQuery};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ComicInfoResponse {
    pub number: u32,
    pub title: String,
    pub alt_text: String,
    pub url: String,
    pub image_url: String,
}

impl From<ComicMetadata> for ComicInfoResponse {
    fn from(meta: ComicMetadata) -> Self {
        Self {
            number: meta.number,
            title: meta.title,
            alt_text: meta.alt,
            url: meta.url,
            image_url: meta.image_url,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /comic
pub async fn handle_random_comic(
    State(state): State<AppState>,
    Query(dims): Query<DimensionsQuery>,
) -> Result<Response, AppError> {
    generate_comic(&state, None, &dims).await
}

/// GET /comic/:number
pub async fn handle_comic(
    State(state): State<AppState>,
    Path(number): Path<u32>,
    Query(dims): Query<DimensionsQuery>,
) -> Result<Response, AppError> {
    validate_comic_number(number)?;
    generate_comic(&state, Some(number), &dims).await
}

/// GET /comic/info/:number
pub async fn handle_comic_info(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<ComicInfoResponse>, AppError> {
    validate_comic_number(number)?;
    let metadata = state.comics.fetch_metadata(Some(number)).await?;
    Ok(Json(metadata.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_comic_number(number: u32) -> Result<(), AppError> {
    if number == 0 {
        return Err(AppError::Validation(
            "Comic numbers start at 1".to_string(),
        ));
    }
    Ok(())
}

async fn generate_comic(
    state: &AppState,
    number: Option<u32>,
    dims: &DimensionsQuery,
) -> Result<Response, AppError> {
    let settings = state.config.compose.clone();
    let (width, height) = dims.resolve(
        settings.default_width,
        settings.default_height,
        settings.max_dimension,
    )?;

    let metadata = state.comics.fetch_metadata(number).await?;
    let comic_bytes = state.comics.fetch_image(&metadata).await?;

    // Composition is CPU-bound; keep it off the async executor.
    let font = SizedFont::new(state.font.clone(), settings.font_size);
    let meta = metadata.clone();
    let compose_settings = settings.clone();
    let jpeg = tokio::task::spawn_blocking(move || {
        render_comic_jpeg(&comic_bytes, &meta, &font, &compose_settings, width, height)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in comic composition: {e}")))??;

    info!(
        number = metadata.number,
        width,
        height,
        bytes = jpeg.len(),
        "Generated comic image"
    );

    if let Some(dir) = &state.config.output_dir {
        let identifier = metadata.number.to_string();
        let suffix = filename_suffix(
            Some(&identifier),
            width,
            height,
            settings.default_width,
            settings.default_height,
        );
        if let Err(e) = save_comic(dir, &suffix, &jpeg).await {
            warn!("Could not save generated comic: {e:#}");
        }
    }

    Ok(jpeg_response(
        jpeg,
        &format!("softer_world_{}.jpg", metadata.number),
    ))
}
