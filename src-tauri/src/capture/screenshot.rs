//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. Everything
//! downstream works on the returned `RgbaImage`.

use image::RgbaImage;
use xcap::Monitor;

/// Captures the primary monitor as straight RGBA pixels.
///
/// Falls back to the first enumerated monitor when none reports itself as
/// primary (common on some X11 setups).
pub fn capture_primary_monitor() -> Result<RgbaImage, CaptureError> {
    let start = std::time::Instant::now();

    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
    let count = monitors.len();

    let mut candidates = monitors.into_iter();
    let first = candidates.next().ok_or(CaptureError::NoMonitor)?;
    let monitor = if first.is_primary().unwrap_or(false) {
        first
    } else {
        candidates
            .find(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(first)
    };

    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    log::info!(
        "[CAPTURE] Captured {}x{} from 1 of {} monitor(s) in {}ms",
        image.width(),
        image.height(),
        count,
        start.elapsed().as_millis()
    );

    Ok(image)
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),
}
