//! Rendering domain — composes the background and annotations into an image
//! and writes it out.

mod export;
mod raster;

pub use export::{default_export_path, default_file_name, save_png, ExportError};
pub use raster::{compose, draw_polyline, draw_shape, draw_stroke};
