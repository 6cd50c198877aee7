//! Drawing domain — public API.
//!
//! Everything here is pure data and logic with no Tauri or OS dependencies,
//! so it can be exercised directly from tests.

pub mod canvas;
pub mod color;
pub mod geometry;
pub mod keymap;
pub mod mode;

pub use canvas::{
    Canvas, CanvasSnapshot, HistoryEntry, HistoryKind, PenState, Shape, Stroke, DEFAULT_PEN_SIZE,
    PEN_SIZE_RANGE,
};
pub use color::{Color, ColorError, HIGHLIGHTER_ALPHA, OPAQUE, PALETTE};
pub use geometry::{Point, Rect};
pub use keymap::Action;
pub use mode::{Mode, ShapeKind};
