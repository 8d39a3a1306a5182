use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::render::qr::QrError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),

    #[error("Could not read page: {0}")]
    Scrape(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("QR code error: {0}")]
    Qr(#[from] QrError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {e}");
                // A 404 from the comic or weather site means the thing asked for is not there.
                if e.status() == Some(404) {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
                } else {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
                }
            }
            AppError::Scrape(msg) => {
                tracing::error!("Scrape error: {msg}");
                (StatusCode::BAD_GATEWAY, "SCRAPE_ERROR", msg.clone())
            }
            AppError::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONFIGURED",
                msg.clone(),
            ),
            AppError::Image(e) => {
                tracing::error!("Image error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IMAGE_ERROR",
                    format!("Could not process image: {e}"),
                )
            }
            AppError::Qr(e) => {
                tracing::error!("QR error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "QR_ERROR",
                    "Could not generate QR code".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("bad view".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_404_maps_to_not_found() {
        let err = AppError::Upstream(FetchError::Status {
            status: 404,
            url: "https://wttr.in/nowhere".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_500_maps_to_bad_gateway() {
        let err = AppError::Upstream(FetchError::Status {
            status: 500,
            url: "https://wttr.in/x".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_configured_maps_to_service_unavailable() {
        let response = AppError::NotConfigured("no key".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
