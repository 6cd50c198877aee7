//! Drawing mode selection.

use super::color::{HIGHLIGHTER_ALPHA, OPAQUE};
use serde::{Deserialize, Serialize};

/// The active tool. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Opaque freehand path (F)
    #[default]
    #[serde(rename = "free")]
    Freehand,
    /// Translucent freehand path (L)
    Highlighter,
    /// Straight line between press and release (N)
    Line,
    /// Rectangle outline from corner to corner (R)
    #[serde(rename = "rect")]
    Rectangle,
    /// Ellipse inscribed in the press/release box (C)
    Circle,
    /// Removes strokes and shapes under the pointer (E)
    Eraser,
}

/// Geometric primitive produced by the shape modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    #[serde(rename = "rect")]
    Rectangle,
    Circle,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Freehand,
        Mode::Highlighter,
        Mode::Line,
        Mode::Rectangle,
        Mode::Circle,
        Mode::Eraser,
    ];

    /// Freehand and highlighter build point paths.
    pub fn is_stroke(self) -> bool {
        matches!(self, Mode::Freehand | Mode::Highlighter)
    }

    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Mode::Line => Some(ShapeKind::Line),
            Mode::Rectangle => Some(ShapeKind::Rectangle),
            Mode::Circle => Some(ShapeKind::Circle),
            _ => None,
        }
    }

    /// Pen alpha implied by the mode.
    pub fn alpha(self) -> u8 {
        match self {
            Mode::Highlighter => HIGHLIGHTER_ALPHA,
            _ => OPAQUE,
        }
    }
}
