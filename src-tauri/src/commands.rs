//! Tauri command handlers for the overlay webview.
//!
//! Mutating commands return the updated [`Scene`] so the frontend can repaint
//! without a second round trip. Errors cross the boundary as strings.

use crate::actions;
use crate::capture;
use crate::session::{Scene, SessionState};
use crate::sketch::{keymap, Color, Mode};
use tauri::{AppHandle, State};

type CommandResult<T> = Result<T, String>;

fn with_scene(
    state: &State<'_, SessionState>,
    f: impl FnOnce(&mut crate::session::Session),
) -> CommandResult<Scene> {
    state
        .with(|s| {
            f(s);
            s.scene()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_scene(state: State<'_, SessionState>) -> CommandResult<Scene> {
    with_scene(&state, |_| {})
}

/// Base64 PNG of the frozen background, or `None` outside drawing mode.
#[tauri::command]
pub fn background_png(state: State<'_, SessionState>) -> CommandResult<Option<String>> {
    let guard = state.lock().map_err(|e| e.to_string())?;
    guard
        .background()
        .map(capture::encode_png_base64)
        .transpose()
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_draw_mode(app: AppHandle) -> CommandResult<Scene> {
    let task_app = app.clone();
    let result = tauri::async_runtime::spawn_blocking(move || actions::toggle_drawing(&task_app))
        .await
        .map_err(|e| format!("Drawing toggle task failed: {}", e))?;

    actions::report_toggle(&app, &result);
    result.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_mode(state: State<'_, SessionState>, mode: Mode) -> CommandResult<Scene> {
    with_scene(&state, |s| s.set_mode(mode))
}

#[tauri::command]
pub fn set_color(state: State<'_, SessionState>, color: Color) -> CommandResult<Scene> {
    with_scene(&state, |s| s.set_color(color))
}

#[tauri::command]
pub fn set_pen_size(state: State<'_, SessionState>, size: u32) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.set_pen_size(size);
    })
}

#[tauri::command]
pub fn set_zoom(state: State<'_, SessionState>, zoom: f32) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.set_zoom(zoom);
    })
}

#[tauri::command]
pub fn toggle_panel(state: State<'_, SessionState>) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.toggle_panel();
    })
}

#[tauri::command]
pub fn pointer_down(state: State<'_, SessionState>, x: f32, y: f32) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.pointer_down(x, y);
    })
}

#[tauri::command]
pub fn pointer_move(state: State<'_, SessionState>, x: f32, y: f32) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.pointer_move(x, y);
    })
}

#[tauri::command]
pub fn pointer_up(state: State<'_, SessionState>, x: f32, y: f32) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.pointer_up(x, y);
    })
}

#[tauri::command]
pub fn undo(state: State<'_, SessionState>) -> CommandResult<Scene> {
    with_scene(&state, |s| {
        s.undo();
    })
}

#[tauri::command]
pub fn clear_canvas(state: State<'_, SessionState>) -> CommandResult<Scene> {
    with_scene(&state, |s| s.clear())
}

/// Resolves a key press from the webview. Unbound keys return the scene
/// unchanged.
#[tauri::command]
pub fn key_press(
    app: AppHandle,
    state: State<'_, SessionState>,
    key: String,
    ctrl: bool,
) -> CommandResult<Scene> {
    match keymap::resolve(&key, ctrl) {
        Some(action) => {
            log::debug!("[KEYS] {} (ctrl={}) -> {:?}", key, ctrl, action);
            actions::apply(&app, action).map_err(|e| e.to_string())
        }
        None => with_scene(&state, |_| {}),
    }
}

/// Opens the save dialog and exports. Returns the written path, or `None`
/// if the user cancelled.
#[tauri::command]
pub async fn save_png(app: AppHandle) -> CommandResult<Option<String>> {
    let task_app = app.clone();
    let result = tauri::async_runtime::spawn_blocking(move || actions::save(&task_app))
        .await
        .map_err(|e| format!("Save task failed: {}", e))?;

    actions::report_save(&app, &result);
    result
        .map(|path| path.map(|p| p.to_string_lossy().to_string()))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn quit_app(app: AppHandle) {
    log::info!("[ACTIONS] Quit requested from panel");
    app.exit(0);
}
