//! User actions shared by the panel buttons, keyboard shortcuts, the tray
//! menu and the global shortcut.
//!
//! `toggle_drawing` and `save` block (window hide/show, capture delay, file
//! dialog) and must run off the main thread; the `spawn_*` wrappers take
//! care of that and report failures as modal messages.

use crate::capture;
use crate::error::{AppError, AppResult};
use crate::notify;
use crate::render::{self, ExportError};
use crate::session::{Scene, SessionState, ToggleStart};
use crate::sketch::Action;
use image::RgbaImage;
use std::path::PathBuf;
use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager, WebviewWindow};
use tauri_plugin_dialog::DialogExt;

pub const OVERLAY_LABEL: &str = "overlay";

/// Event carrying a fresh [`Scene`] after changes the webview did not start.
pub const SCENE_CHANGED: &str = "scene-changed";

pub fn emit_scene(app: &AppHandle) {
    let state = app.state::<SessionState>();
    match state.with(|s| s.scene()) {
        Ok(scene) => {
            if let Err(e) = app.emit(SCENE_CHANGED, &scene) {
                log::warn!("[ACTIONS] Failed to emit scene: {}", e);
            }
        }
        Err(e) => log::error!("[ACTIONS] {}", e),
    }
}

/// Enters or leaves drawing mode.
///
/// Entering hides the overlay, waits for the compositor, captures the
/// primary monitor and shows the overlay again with the capture as its
/// background. Leaving discards the background and every annotation and
/// hides the overlay, so the desktop gets its pointer back. A toggle that
/// arrives while a capture is in flight is ignored.
pub fn toggle_drawing(app: &AppHandle) -> AppResult<Scene> {
    let state = app.state::<SessionState>();
    let window = app
        .get_webview_window(OVERLAY_LABEL)
        .ok_or(AppError::NoOverlay)?;

    match state.with(|s| s.begin_toggle())? {
        ToggleStart::Busy => {
            log::info!("[ACTIONS] Toggle ignored: capture already in progress");
            return state.with(|s| s.scene());
        }
        ToggleStart::Stopped => {
            window.hide()?;
            return state.with(|s| s.scene());
        }
        ToggleStart::Capture => {}
    }

    match capture_behind(&window, state.settings().capture_delay) {
        Ok(background) => state.with(|s| {
            s.finish_capture(Some(background));
            s.scene()
        }),
        Err(e) => {
            state.with(|s| s.finish_capture(None))?;
            if let Err(hide) = window.hide() {
                log::warn!("[ACTIONS] Could not hide overlay: {}", hide);
            }
            Err(e)
        }
    }
}

/// Hides `window`, captures the screen, and shows the window again even if
/// the capture failed.
fn capture_behind(window: &WebviewWindow, delay: Duration) -> AppResult<RgbaImage> {
    window.hide()?;
    std::thread::sleep(delay);
    let captured = capture::capture_primary_monitor();
    window.show()?;
    if let Err(e) = window.set_focus() {
        log::warn!("[ACTIONS] Could not focus overlay: {}", e);
    }
    Ok(captured?)
}

/// Asks for a destination and writes the composed image there.
///
/// Returns `Ok(None)` when the user cancels the dialog.
pub fn save(app: &AppHandle) -> AppResult<Option<PathBuf>> {
    let state = app.state::<SessionState>();

    if !state.with(|s| s.is_drawing() && s.background().is_some())? {
        return Err(ExportError::NotDrawing.into());
    }

    let Some(path) = app
        .dialog()
        .file()
        .set_title("Save Drawing")
        .set_directory(&state.settings().export_dir)
        .set_file_name(render::default_file_name())
        .add_filter("PNG Files", &["png"])
        .add_filter("All Files", &["*"])
        .blocking_save_file()
    else {
        log::info!("[EXPORT] Save cancelled");
        return Ok(None);
    };

    let path = path
        .into_path()
        .map_err(|e| ExportError::WriteFailed {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

    // Compose under the lock, write after releasing it.
    let image = state.lock()?.compose()?;
    render::save_png(&image, &path)?;
    Ok(Some(path))
}

/// Reports the outcome of a toggle attempt to the user.
pub fn report_toggle(app: &AppHandle, result: &AppResult<Scene>) {
    if let Err(e) = result {
        notify::error(app, format!("Error changing drawing mode: {}", e));
    }
    emit_scene(app);
}

/// Reports the outcome of a save attempt to the user.
pub fn report_save(app: &AppHandle, result: &AppResult<Option<PathBuf>>) {
    match result {
        Ok(Some(_)) => notify::info(app, "Drawing saved!"),
        Ok(None) => {}
        Err(AppError::Export(ExportError::NotDrawing)) => {
            notify::warning(app, "Start drawing mode first!")
        }
        Err(e) => notify::error(app, format!("Save error: {}", e)),
    }
}

pub fn spawn_toggle_drawing(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let result = toggle_drawing(&app);
        report_toggle(&app, &result);
    });
}

pub fn spawn_save(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let result = save(&app);
        report_save(&app, &result);
    });
}

/// Applies a resolved keyboard action. Blocking actions are spawned and
/// announce their result through [`SCENE_CHANGED`]; the returned scene is the
/// state right after dispatch.
pub fn apply(app: &AppHandle, action: Action) -> AppResult<Scene> {
    let state = app.state::<SessionState>();
    match action {
        Action::ToggleDrawing => spawn_toggle_drawing(app),
        Action::Save => spawn_save(app),
        Action::Quit => {
            log::info!("[ACTIONS] Quit requested");
            app.exit(0);
        }
        Action::TogglePanel => {
            state.with(|s| s.toggle_panel())?;
        }
        Action::Clear => state.with(|s| s.clear())?,
        Action::Undo => {
            state.with(|s| s.undo())?;
        }
        Action::SetMode(mode) => state.with(|s| s.set_mode(mode))?,
    }
    state.with(|s| s.scene())
}
