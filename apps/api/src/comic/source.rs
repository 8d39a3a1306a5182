//! Comic metadata and image retrieval.
//!
//! `ComicSource` is the seam between the HTTP handlers and the site being scraped.
//! `AppState` carries it as `Arc<dyn ComicSource>`; `SofterWorldSource` is the
//! production implementation.

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::fetch::HttpFetcher;

const COMIC_PAGE_BASE: &str = "https://www.asofterworld.com/index.php";
const COMIC_IMAGE_SELECTOR: &str = "#comicimg > img";

/// Printed under the QR code on every composed comic.
pub const ATTRIBUTION: &str = "www.asofterworld.com";
/// Highest comic number; random picks are drawn from `1..=LATEST_COMIC`.
pub const LATEST_COMIC: u32 = 1242;

/// Everything scraped from a comic page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComicMetadata {
    pub number: u32,
    pub title: String,
    /// Caption printed under the comic. The site only has a `title`, so this mirrors it.
    pub alt: String,
    /// The comic's page.
    pub url: String,
    pub image_url: String,
}

/// Page URL for comic `number`.
pub fn comic_page_url(number: u32) -> String {
    format!("{COMIC_PAGE_BASE}?id={number}")
}

pub fn random_comic_number() -> u32 {
    rand::thread_rng().gen_range(1..=LATEST_COMIC)
}

/// Extracts comic metadata from a page's HTML.
///
/// The image is the `img` directly under `#comicimg`. A relative `src` is resolved
/// against `page_url`; a missing `title` yields an empty caption.
pub fn parse_comic_page(html: &str, page_url: &str, number: u32) -> Result<ComicMetadata, AppError> {
    let selector = Selector::parse(COMIC_IMAGE_SELECTOR)
        .map_err(|e| AppError::Scrape(format!("invalid selector {COMIC_IMAGE_SELECTOR}: {e:?}")))?;
    let document = Html::parse_document(html);

    let img = document
        .select(&selector)
        .next()
        .ok_or_else(|| AppError::Scrape(format!("no comic image on {page_url}")))?;

    let src = img
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Scrape(format!("comic image on {page_url} has no src")))?;

    let image_url = Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map_err(|e| AppError::Scrape(format!("bad image url {src:?}: {e}")))?;

    let title = img.value().attr("title").unwrap_or_default().to_string();

    Ok(ComicMetadata {
        number,
        alt: title.clone(),
        title,
        url: page_url.to_string(),
        image_url: image_url.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ComicSource: Send + Sync {
    /// Fetches metadata for `number`, or for a random comic when `None`.
    async fn fetch_metadata(&self, number: Option<u32>) -> Result<ComicMetadata, AppError>;

    /// Downloads the comic image bytes referenced by `metadata`.
    async fn fetch_image(&self, metadata: &ComicMetadata) -> Result<Bytes, AppError>;
}

/// Scrapes asofterworld.com.
pub struct SofterWorldSource {
    fetcher: HttpFetcher,
}

impl SofterWorldSource {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ComicSource for SofterWorldSource {
    async fn fetch_metadata(&self, number: Option<u32>) -> Result<ComicMetadata, AppError> {
        let number = number.unwrap_or_else(random_comic_number);
        let page_url = comic_page_url(number);

        let html = self.fetcher.fetch_text(&page_url).await?;
        let metadata = parse_comic_page(&html, &page_url, number)?;

        info!(number, title = %metadata.title, "Fetched comic metadata");
        Ok(metadata)
    }

    async fn fetch_image(&self, metadata: &ComicMetadata) -> Result<Bytes, AppError> {
        debug!(url = %metadata.image_url, "Downloading comic image");
        Ok(self.fetcher.fetch_bytes(&metadata.image_url).await?)
    }
}
