//! HTTP fetcher: the single point of entry for outbound requests.
//!
//! Comic pages, comic images, wttr.in and OpenWeatherMap all go through
//! `HttpFetcher`. There is no retry or caching layer; a failed upstream call
//! fails the request that triggered it.
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    Status { status: u16, url: String },
}

impl FetchError {
    /// Upstream status code, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Shared HTTP client. Cheap to clone.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the raw body.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.get(url, &[] as &[(&str, &str)]).await?;
        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "Fetched body");
        Ok(body)
    }

    /// GETs `url` and returns the body decoded as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, &[] as &[(&str, &str)]).await?;
        Ok(response.text().await?)
    }

    /// GETs `url` with query parameters and deserializes a JSON body.
    pub async fn fetch_json<T, Q>(&self, url: &str, query: &Q) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.get(url, query).await?;
        Ok(response.json().await?)
    }

    async fn get<Q>(&self, url: &str, query: &Q) -> Result<Response, FetchError>
    where
        Q: Serialize + ?Sized,
    {
        debug!(url, "GET");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Upstream request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
