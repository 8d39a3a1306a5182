//! Shared query parsing and image responses for the image endpoints.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;

/// `?width=&height=` on image endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DimensionsQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DimensionsQuery {
    /// Fills missing dimensions from the defaults and checks both are in `1..=max`.
    pub fn resolve(
        &self,
        default_width: u32,
        default_height: u32,
        max: u32,
    ) -> Result<(u32, u32), AppError> {
        let width = self.width.unwrap_or(default_width);
        let height = self.height.unwrap_or(default_height);
        check_dimension("width", width, max)?;
        check_dimension("height", height, max)?;
        Ok((width, height))
    }

    /// Requested size only when both dimensions were given.
    pub fn exact(&self, max: u32) -> Result<Option<(u32, u32)>, AppError> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => {
                check_dimension("width", width, max)?;
                check_dimension("height", height, max)?;
                Ok(Some((width, height)))
            }
            _ => Ok(None),
        }
    }
}

fn check_dimension(name: &str, value: u32, max: u32) -> Result<(), AppError> {
    if value == 0 || value > max {
        return Err(AppError::Validation(format!(
            "{name} must be between 1 and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Serves JPEG bytes inline with a download filename.
pub fn jpeg_response(jpeg: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        jpeg,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_resolve_uses_defaults() {
        let q = DimensionsQuery::default();
        assert_eq!(q.resolve(600, 448, 4096).unwrap(), (600, 448));
    }

    #[test]
    fn test_resolve_mixes_given_and_default() {
        let q = DimensionsQuery {
            width: Some(800),
            height: None,
        };
        assert_eq!(q.resolve(600, 448, 4096).unwrap(), (800, 448));
    }

    #[test]
    fn test_resolve_rejects_zero_and_oversized() {
        let zero = DimensionsQuery {
            width: Some(0),
            height: None,
        };
        assert!(matches!(
            zero.resolve(600, 448, 4096),
            Err(AppError::Validation(_))
        ));

        let huge = DimensionsQuery {
            width: None,
            height: Some(5000),
        };
        assert!(huge.resolve(600, 448, 4096).is_err());
    }

    #[test]
    fn test_exact_requires_both_dimensions() {
        let only_width = DimensionsQuery {
            width: Some(300),
            height: None,
        };
        assert_eq!(only_width.exact(4096).unwrap(), None);

        let both = DimensionsQuery {
            width: Some(300),
            height: Some(200),
        };
        assert_eq!(both.exact(4096).unwrap(), Some((300, 200)));
    }

    #[test]
    fn test_jpeg_response_headers() {
        let response = jpeg_response(vec![0xFF, 0xD8], "softer_world_5.jpg");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"softer_world_5.jpg\""
        );
    }
}
