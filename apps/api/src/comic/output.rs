//! Writing composed comics to an output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

const FILE_PREFIX: &str = "softer-world";

/// Filename suffix for a generated image: `-WxH` when the canvas differs from
/// the default size, then `-<identifier>` (`-daily` without one).
pub fn filename_suffix(
    identifier: Option<&str>,
    width: u32,
    height: u32,
    default_width: u32,
    default_height: u32,
) -> String {
    let identifier = identifier.unwrap_or("daily");
    if (width, height) != (default_width, default_height) {
        format!("-{width}x{height}-{identifier}")
    } else {
        format!("-{identifier}")
    }
}

/// Writes `jpeg` to `<dir>/softer-world<suffix>.jpg`, replacing any existing file.
pub async fn save_comic(dir: &Path, suffix: &str, jpeg: &[u8]) -> Result<PathBuf> {
    let path = dir.join(format!("{FILE_PREFIX}{suffix}.jpg"));
    tokio::fs::write(&path, jpeg)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), bytes = jpeg.len(), "Saved generated comic");
    Ok(path)
}
