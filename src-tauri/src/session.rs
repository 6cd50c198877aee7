//! Session state: drawing mode, frozen background, zoom, panel visibility,
//! and the canvas itself.
//!
//! Held in Tauri managed state behind a `Mutex`. All pointer positions
//! arriving here are in screen pixels and are converted to logical canvas
//! coordinates before reaching the canvas.

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::render::{self, ExportError};
use crate::sketch::{Canvas, Color, Mode, PenState, Point, Shape, Stroke};
use image::RgbaImage;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard};

/// Zoom factors offered by the panel slider (in steps of 0.1).
pub const ZOOM_RANGE: RangeInclusive<f32> = 0.5..=3.0;

/// Logical coordinates are clamped to ±this; far beyond any real display.
const COORD_LIMIT: i32 = 1 << 20;

/// Outcome of asking to toggle drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleStart {
    /// Another toggle is still capturing; this one is dropped.
    Busy,
    /// Drawing mode was on and has been switched off.
    Stopped,
    /// Drawing mode is off: the caller must capture and then call
    /// [`Session::finish_capture`].
    Capture,
}

#[derive(Debug)]
pub struct Session {
    draw_mode: bool,
    toggling: bool,
    background: Option<RgbaImage>,
    canvas: Canvas,
    zoom: f32,
    panel_visible: bool,
}

/// Everything the webview needs to repaint, minus the background pixels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub draw_mode: bool,
    pub mode: Mode,
    pub pen: PenState,
    pub zoom: f32,
    pub panel_visible: bool,
    pub can_undo: bool,
    pub strokes: Vec<Stroke>,
    pub shapes: Vec<Shape>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Canvas::new())
    }
}

impl Session {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            draw_mode: false,
            toggling: false,
            background: None,
            canvas,
            zoom: 1.0,
            panel_visible: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Canvas::with_pen(settings.color, settings.pen_size))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn is_drawing(&self) -> bool {
        self.draw_mode
    }

    pub fn is_toggling(&self) -> bool {
        self.toggling
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn scene(&self) -> Scene {
        Scene {
            draw_mode: self.draw_mode,
            mode: self.canvas.mode(),
            pen: self.canvas.pen(),
            zoom: self.zoom,
            panel_visible: self.panel_visible,
            can_undo: !self.canvas.history().is_empty(),
            strokes: self.canvas.strokes().to_vec(),
            shapes: self.canvas.shapes().to_vec(),
        }
    }

    // ── Drawing mode ─────────────────────────────────────────────────

    /// Enters drawing mode over a freshly captured background.
    pub fn start_drawing(&mut self, background: RgbaImage) {
        log::info!(
            "[SESSION] Drawing started over {}x{} background",
            background.width(),
            background.height()
        );
        self.background = Some(background);
        self.draw_mode = true;
    }

    /// Leaves drawing mode: drops the background, clears every stroke, shape
    /// and history entry, and resets zoom. Pen settings survive.
    pub fn stop_drawing(&mut self) {
        self.draw_mode = false;
        self.background = None;
        self.canvas.clear();
        self.zoom = 1.0;
        log::info!("[SESSION] Drawing stopped");
    }

    /// First half of a drawing toggle, decided under the lock.
    ///
    /// While a capture is in flight every further toggle is `Busy`, so two
    /// toggles can never interleave their hide/capture/show sequences.
    pub fn begin_toggle(&mut self) -> ToggleStart {
        if self.toggling {
            return ToggleStart::Busy;
        }
        if self.draw_mode {
            self.stop_drawing();
            return ToggleStart::Stopped;
        }
        self.toggling = true;
        ToggleStart::Capture
    }

    /// Second half of a toggle that returned [`ToggleStart::Capture`].
    /// `None` means the capture failed and drawing stays off.
    pub fn finish_capture(&mut self, background: Option<RgbaImage>) {
        self.toggling = false;
        if let Some(background) = background {
            self.start_drawing(background);
        }
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        self.panel_visible
    }

    // ── Pen settings ─────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        self.canvas.set_mode(mode);
    }

    pub fn set_color(&mut self, color: Color) {
        self.canvas.set_color(color);
    }

    pub fn set_pen_size(&mut self, width: u32) -> u32 {
        self.canvas.set_pen_size(width)
    }

    /// Sets the zoom factor, clamped to [`ZOOM_RANGE`]. Non-finite input is
    /// ignored. Returns the applied factor.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(*ZOOM_RANGE.start(), *ZOOM_RANGE.end());
        }
        self.zoom
    }

    // ── Pointer events ───────────────────────────────────────────────

    /// Screen position to canvas coordinates: divide out the zoom, truncate,
    /// clamp to a sane range. NaN maps to 0.
    pub fn to_logical(&self, x: f32, y: f32) -> Point {
        let axis = |v: f32| ((v / self.zoom) as i32).clamp(-COORD_LIMIT, COORD_LIMIT);
        Point::new(axis(x), axis(y))
    }

    /// Returns `false` when the event was ignored (not in drawing mode).
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if !self.draw_mode {
            return false;
        }
        let p = self.to_logical(x, y);
        self.canvas.pointer_down(p);
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.draw_mode || !self.canvas.is_drawing() {
            return false;
        }
        let p = self.to_logical(x, y);
        self.canvas.pointer_move(p);
        true
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        if !self.draw_mode {
            return false;
        }
        let p = self.to_logical(x, y);
        self.canvas.pointer_up(p);
        true
    }

    pub fn undo(&mut self) -> bool {
        self.canvas.undo()
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Composes background and annotations as currently displayed.
    pub fn compose(&self) -> Result<RgbaImage, ExportError> {
        match (&self.background, self.draw_mode) {
            (Some(background), true) => Ok(render::compose(background, &self.canvas, self.zoom)),
            _ => Err(ExportError::NotDrawing),
        }
    }
}

/// Tauri managed state.
pub struct SessionState {
    session: Mutex<Session>,
    settings: Settings,
}

impl SessionState {
    pub fn new(settings: Settings) -> Self {
        Self {
            session: Mutex::new(Session::from_settings(&settings)),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lock(&self) -> AppResult<MutexGuard<'_, Session>> {
        self.session.lock().map_err(|_| AppError::StatePoisoned)
    }

    /// Runs `f` against the locked session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> AppResult<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }
}
