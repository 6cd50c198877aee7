//! Writing the composed image to disk.

use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Saves `image` as PNG at `path`, whatever extension the path carries.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    let start = std::time::Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(ExportError::MissingDirectory(parent.to_path_buf()));
        }
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ExportError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    log::info!(
        "[EXPORT] Saved {} in {}ms",
        path.display(),
        start.elapsed().as_millis()
    );
    Ok(())
}

/// Suggested file name for a new export: `sketch-<unix seconds>.png`.
pub fn default_file_name() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("sketch-{}.png", secs)
}

pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(default_file_name())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing to export: start drawing mode first")]
    NotDrawing,

    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },
}
