//! System-wide shortcut that toggles drawing mode while the overlay is not
//! focused.

use crate::actions;
use tauri::{plugin::TauriPlugin, AppHandle, Wry};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

/// Plugin whose handler toggles drawing on every registered shortcut press.
pub fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_global_shortcut::Builder::new()
        .with_handler(|app, shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                log::info!("[SHORTCUT] {:?} pressed — toggling drawing mode", shortcut);
                actions::spawn_toggle_drawing(app);
            }
        })
        .build()
}

/// Registers the configured accelerator. Failure is logged, not fatal: the
/// tray and the panel still work.
pub fn register(app: &AppHandle, accelerator: &str) {
    let shortcut: Shortcut = match accelerator.parse() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[SHORTCUT] Invalid accelerator '{}': {}", accelerator, e);
            return;
        }
    };

    match app.global_shortcut().register(shortcut) {
        Ok(()) => log::info!("[SHORTCUT] Registered {}", accelerator),
        Err(e) => log::warn!("[SHORTCUT] Could not register {}: {}", accelerator, e),
    }
}
