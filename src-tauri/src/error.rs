//! Application-level error type.
//!
//! Domain modules define their own errors; this enum gathers them for the
//! shell. Tauri commands still hand the frontend a plain `String`.

use crate::capture::{CaptureError, EncodeError};
use crate::render::ExportError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Window error: {0}")]
    Window(#[from] tauri::Error),

    #[error("Session state is unavailable (a previous operation panicked)")]
    StatePoisoned,

    #[error("Overlay window not found")]
    NoOverlay,
}

pub type AppResult<T> = Result<T, AppError>;
