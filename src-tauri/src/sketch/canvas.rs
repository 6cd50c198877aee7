//! The annotation model: strokes, shapes and the undo history.
//!
//! Pure state machine — no windowing, no rendering. Pointer events arrive in
//! logical canvas coordinates (the session divides out the zoom first).

use super::color::Color;
use super::geometry::{Point, Rect};
use super::mode::{Mode, ShapeKind};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Valid pen widths in pixels.
pub const PEN_SIZE_RANGE: RangeInclusive<u32> = 1..=25;

pub const DEFAULT_PEN_SIZE: u32 = 5;

/// Eraser radius as a multiple of the pen width.
const ERASER_RADIUS_FACTOR: i64 = 2;

/// Freehand or highlighter path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: u32,
}

impl Stroke {
    /// True if any point lies strictly inside the circle of the given squared radius.
    pub fn is_near(&self, p: Point, radius_sq: i64) -> bool {
        self.points.iter().any(|q| q.distance_sq(p) < radius_sq)
    }
}

/// Line, rectangle or circle defined by its press and release corners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub width: u32,
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }

    /// Lines are hit near either endpoint; boxes and ellipses anywhere inside
    /// their bounding box.
    pub fn is_hit(&self, p: Point, radius_sq: i64) -> bool {
        match self.kind {
            ShapeKind::Line => {
                self.start.distance_sq(p) < radius_sq || self.end.distance_sq(p) < radius_sq
            }
            ShapeKind::Rectangle | ShapeKind::Circle => self.bounds().contains(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Stroke,
    Shape,
}

/// One undoable action: which list gained an item, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub index: usize,
}

/// Current pen colour (alpha already adjusted for the mode) and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenState {
    pub color: Color,
    pub width: u32,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: DEFAULT_PEN_SIZE,
        }
    }
}

/// Pointer held down; the mode is latched so switching tools mid-drag
/// cannot split one gesture across two item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gesture {
    mode: Mode,
    anchor: Point,
}

/// Strokes and shapes as they stood at some moment; used to compare states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasSnapshot {
    pub strokes: Vec<Stroke>,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    strokes: Vec<Stroke>,
    shapes: Vec<Shape>,
    history: Vec<HistoryEntry>,
    mode: Mode,
    pen: PenState,
    gesture: Option<Gesture>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas starting with the given pen settings instead of the defaults.
    pub fn with_pen(color: Color, width: u32) -> Self {
        let mut canvas = Self::new();
        canvas.set_color(color);
        canvas.set_pen_size(width);
        canvas
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            strokes: self.strokes.clone(),
            shapes: self.shapes.clone(),
        }
    }

    // ── Pen settings ─────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.pen.color = self.pen.color.with_alpha(mode.alpha());
        log::debug!("[CANVAS] Mode set to {:?}", mode);
    }

    /// Replaces the pen colour. The incoming alpha is ignored; the active
    /// mode decides it.
    pub fn set_color(&mut self, color: Color) {
        self.pen.color = color.with_alpha(self.mode.alpha());
    }

    /// Sets the pen width, clamped to [`PEN_SIZE_RANGE`]. Returns the applied width.
    pub fn set_pen_size(&mut self, width: u32) -> u32 {
        self.pen.width = width.clamp(*PEN_SIZE_RANGE.start(), *PEN_SIZE_RANGE.end());
        self.pen.width
    }

    // ── Pointer gestures ─────────────────────────────────────────────

    pub fn pointer_down(&mut self, p: Point) {
        self.gesture = Some(Gesture {
            mode: self.mode,
            anchor: p,
        });

        if self.mode.is_stroke() {
            self.strokes.push(Stroke {
                points: vec![p],
                color: self.pen.color,
                width: self.pen.width,
            });
            self.history.push(HistoryEntry {
                kind: HistoryKind::Stroke,
                index: self.strokes.len() - 1,
            });
        } else if self.mode == Mode::Eraser {
            self.erase_at(p);
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        let Some(gesture) = self.gesture else {
            return;
        };

        if gesture.mode.is_stroke() {
            if let Some(stroke) = self.strokes.last_mut() {
                stroke.points.push(p);
            }
        } else if gesture.mode == Mode::Eraser {
            self.erase_at(p);
        }
    }

    pub fn pointer_up(&mut self, p: Point) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };

        if let Some(kind) = gesture.mode.shape_kind() {
            self.shapes.push(Shape {
                kind,
                start: gesture.anchor,
                end: p,
                color: self.pen.color,
                width: self.pen.width,
            });
            self.history.push(HistoryEntry {
                kind: HistoryKind::Shape,
                index: self.shapes.len() - 1,
            });
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Removes every stroke and shape under the eraser at `p`.
    ///
    /// The radius is twice the pen width. History entries of removed items
    /// are dropped and later indices shifted so every entry stays valid.
    /// Returns the number of removed items.
    pub fn erase_at(&mut self, p: Point) -> usize {
        let radius = i64::from(self.pen.width) * ERASER_RADIUS_FACTOR;
        let radius_sq = radius * radius;

        let stroke_hits: Vec<bool> = self.strokes.iter().map(|s| s.is_near(p, radius_sq)).collect();
        let shape_hits: Vec<bool> = self.shapes.iter().map(|s| s.is_hit(p, radius_sq)).collect();

        let removed = stroke_hits.iter().chain(&shape_hits).filter(|hit| **hit).count();
        if removed == 0 {
            return 0;
        }

        remove_flagged(&mut self.strokes, &stroke_hits);
        remove_flagged(&mut self.shapes, &shape_hits);

        self.history = self
            .history
            .iter()
            .filter_map(|entry| {
                let hits = match entry.kind {
                    HistoryKind::Stroke => &stroke_hits,
                    HistoryKind::Shape => &shape_hits,
                };
                reindex(*entry, hits)
            })
            .collect();

        log::debug!("[CANVAS] Erased {} item(s) at ({}, {})", removed, p.x, p.y);
        removed
    }

    /// Undoes the most recent action.
    ///
    /// Returns `true` if an item was removed. An entry whose index no longer
    /// exists is consumed without touching the lists.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        self.gesture = None;

        let removed = match entry.kind {
            HistoryKind::Stroke if entry.index < self.strokes.len() => {
                self.strokes.remove(entry.index);
                true
            }
            HistoryKind::Shape if entry.index < self.shapes.len() => {
                self.shapes.remove(entry.index);
                true
            }
            _ => false,
        };

        if !removed {
            log::warn!("[CANVAS] Skipped stale history entry {:?}", entry);
        }
        removed
    }

    /// Removes all strokes, shapes and history.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.shapes.clear();
        self.history.clear();
        self.gesture = None;
    }
}

fn remove_flagged<T>(items: &mut Vec<T>, flags: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !flags[i];
        i += 1;
        keep
    });
}

fn reindex(entry: HistoryEntry, hits: &[bool]) -> Option<HistoryEntry> {
    if *hits.get(entry.index)? {
        return None;
    }
    let shift = hits[..entry.index].iter().filter(|hit| **hit).count();
    Some(HistoryEntry {
        index: entry.index - shift,
        ..entry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::color::{HIGHLIGHTER_ALPHA, OPAQUE};

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn stroke(canvas: &mut Canvas, points: &[(i32, i32)]) {
        let (first, rest) = points.split_first().unwrap();
        canvas.pointer_down(pt(first.0, first.1));
        for &(x, y) in rest {
            canvas.pointer_move(pt(x, y));
        }
        let last = points.last().unwrap();
        canvas.pointer_up(pt(last.0, last.1));
    }

    fn shape(canvas: &mut Canvas, mode: Mode, from: (i32, i32), to: (i32, i32)) {
        canvas.set_mode(mode);
        canvas.pointer_down(pt(from.0, from.1));
        canvas.pointer_move(pt((from.0 + to.0) / 2, (from.1 + to.1) / 2));
        canvas.pointer_up(pt(to.0, to.1));
    }

    // ── Drawing ──────────────────────────────────────────────────────

    #[test]
    fn freehand_records_every_point() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(c.strokes().len(), 1);
        assert_eq!(c.strokes()[0].points, vec![pt(0, 0), pt(1, 1), pt(2, 2)]);
        assert_eq!(c.history(), &[HistoryEntry { kind: HistoryKind::Stroke, index: 0 }]);
    }

    #[test]
    fn stroke_history_is_recorded_on_press() {
        let mut c = Canvas::new();
        c.pointer_down(pt(5, 5));
        assert_eq!(c.history().len(), 1);
        assert!(c.is_drawing());
    }

    #[test]
    fn shape_is_created_on_release_only() {
        let mut c = Canvas::new();
        c.set_mode(Mode::Rectangle);
        c.pointer_down(pt(10, 10));
        c.pointer_move(pt(20, 20));
        assert!(c.shapes().is_empty());
        c.pointer_up(pt(30, 40));
        assert_eq!(c.shapes().len(), 1);
        let s = &c.shapes()[0];
        assert_eq!((s.kind, s.start, s.end), (ShapeKind::Rectangle, pt(10, 10), pt(30, 40)));
        assert_eq!(c.history(), &[HistoryEntry { kind: HistoryKind::Shape, index: 0 }]);
    }

    #[test]
    fn move_and_release_without_press_are_ignored() {
        let mut c = Canvas::new();
        c.pointer_move(pt(1, 1));
        c.set_mode(Mode::Line);
        c.pointer_up(pt(2, 2));
        assert!(c.is_empty());
        assert!(c.history().is_empty());
    }

    #[test]
    fn gesture_keeps_mode_from_press() {
        let mut c = Canvas::new();
        c.pointer_down(pt(0, 0));
        c.set_mode(Mode::Line);
        c.pointer_move(pt(1, 1));
        c.pointer_up(pt(2, 2));
        assert_eq!(c.strokes()[0].points.len(), 2);
        assert!(c.shapes().is_empty());
    }

    // ── Pen settings ─────────────────────────────────────────────────

    #[test]
    fn highlighter_sets_partial_alpha() {
        let mut c = Canvas::new();
        c.set_mode(Mode::Highlighter);
        assert_eq!(c.pen().color.a, HIGHLIGHTER_ALPHA);
        c.set_mode(Mode::Freehand);
        assert_eq!(c.pen().color.a, OPAQUE);
    }

    #[test]
    fn colour_change_keeps_highlighter_alpha() {
        let mut c = Canvas::new();
        c.set_mode(Mode::Highlighter);
        c.set_color("#2ecc71".parse().unwrap());
        assert_eq!(c.pen().color, Color::rgba(0x2e, 0xcc, 0x71, HIGHLIGHTER_ALPHA));
    }

    #[test]
    fn pen_size_is_clamped() {
        let mut c = Canvas::new();
        assert_eq!(c.set_pen_size(0), 1);
        assert_eq!(c.set_pen_size(100), 25);
        assert_eq!(c.set_pen_size(12), 12);
    }

    // ── Eraser ───────────────────────────────────────────────────────

    #[test]
    fn eraser_removes_stroke_within_radius() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(100, 100), (110, 100)]);
        stroke(&mut c, &[(300, 300)]);
        c.set_mode(Mode::Eraser);
        // radius = 2 * 5 = 10, strict comparison
        assert_eq!(c.erase_at(pt(100, 109)), 1);
        assert_eq!(c.strokes().len(), 1);
        assert_eq!(c.strokes()[0].points, vec![pt(300, 300)]);
    }

    #[test]
    fn eraser_boundary_is_exclusive() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0)]);
        assert_eq!(c.erase_at(pt(10, 0)), 0);
        assert_eq!(c.strokes().len(), 1);
    }

    #[test]
    fn eraser_hits_line_endpoints_only() {
        let mut c = Canvas::new();
        shape(&mut c, Mode::Line, (0, 0), (200, 0));
        assert_eq!(c.erase_at(pt(100, 0)), 0);
        assert_eq!(c.erase_at(pt(199, 1)), 1);
        assert!(c.shapes().is_empty());
    }

    #[test]
    fn eraser_hits_anywhere_inside_box_shapes() {
        let mut c = Canvas::new();
        shape(&mut c, Mode::Rectangle, (50, 50), (0, 0));
        shape(&mut c, Mode::Circle, (100, 100), (200, 200));
        assert_eq!(c.erase_at(pt(25, 25)), 1);
        assert_eq!(c.shapes()[0].kind, ShapeKind::Circle);
        assert_eq!(c.erase_at(pt(150, 150)), 1);
        assert!(c.shapes().is_empty());
    }

    #[test]
    fn eraser_drag_erases_along_path() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0)]);
        stroke(&mut c, &[(100, 0)]);
        c.set_mode(Mode::Eraser);
        c.pointer_down(pt(0, 0));
        assert_eq!(c.strokes().len(), 1);
        c.pointer_move(pt(100, 0));
        assert!(c.strokes().is_empty());
        c.pointer_up(pt(100, 0));
        assert!(c.shapes().is_empty());
    }

    #[test]
    fn erase_reindexes_history() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0)]);
        stroke(&mut c, &[(500, 500)]);
        stroke(&mut c, &[(900, 900)]);
        c.erase_at(pt(0, 0));
        assert_eq!(
            c.history(),
            &[
                HistoryEntry { kind: HistoryKind::Stroke, index: 0 },
                HistoryEntry { kind: HistoryKind::Stroke, index: 1 },
            ]
        );
        assert!(c.undo());
        assert_eq!(c.strokes()[0].points, vec![pt(500, 500)]);
    }

    // ── Undo / clear ─────────────────────────────────────────────────

    #[test]
    fn undo_removes_most_recent_item_across_lists() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0), (5, 5)]);
        shape(&mut c, Mode::Circle, (10, 10), (20, 20));
        assert!(c.undo());
        assert!(c.shapes().is_empty());
        assert_eq!(c.strokes().len(), 1);
        assert!(c.undo());
        assert!(c.is_empty());
        assert!(!c.undo());
    }

    #[test]
    fn undo_skips_stale_entry() {
        let mut c = Canvas::new();
        c.history.push(HistoryEntry { kind: HistoryKind::Shape, index: 3 });
        assert!(!c.undo());
        assert!(c.history().is_empty());
    }

    #[test]
    fn undo_cancels_active_gesture() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0)]);
        c.pointer_down(pt(50, 50));
        assert!(c.undo());
        assert!(!c.is_drawing());
        c.pointer_move(pt(60, 60));
        assert_eq!(c.strokes().len(), 1);
        assert_eq!(c.strokes()[0].points, vec![pt(0, 0)]);
    }

    #[test]
    fn clear_cancels_pending_shape() {
        let mut c = Canvas::new();
        c.set_mode(Mode::Rectangle);
        c.pointer_down(pt(10, 10));
        c.clear();
        assert!(!c.is_drawing());
        c.pointer_up(pt(40, 40));
        assert!(c.shapes().is_empty());
        assert!(c.history().is_empty());
    }

    #[test]
    fn erase_at_extreme_coordinates_does_not_panic() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(i32::MIN, i32::MIN)]);
        c.set_mode(Mode::Line);
        c.pointer_down(pt(i32::MIN, 0));
        c.pointer_up(pt(i32::MIN, 0));
        assert_eq!(c.erase_at(pt(i32::MAX, i32::MAX)), 0);
        assert_eq!(c.strokes().len(), 1);
        assert_eq!(c.shapes().len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut c = Canvas::new();
        stroke(&mut c, &[(0, 0)]);
        shape(&mut c, Mode::Line, (0, 0), (9, 9));
        c.clear();
        assert!(c.is_empty());
        assert!(c.history().is_empty());
        assert!(!c.undo());
    }

    #[test]
    fn with_pen_applies_settings() {
        let c = Canvas::with_pen("#ffffff".parse().unwrap(), 40);
        assert_eq!(c.pen().width, 25);
        assert_eq!(c.pen().color, Color::rgba(255, 255, 255, OPAQUE));
    }
}
