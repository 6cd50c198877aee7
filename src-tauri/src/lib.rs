//! Sketch Overlay — Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - Drawing model (sketch/) and session state (session.rs)
//! - Screen capture (capture/) and export rendering (render/)
//! - System tray (tray.rs) and global shortcut (shortcut.rs)
//! - Tauri command handlers for the overlay webview (commands.rs)

pub mod actions;
pub mod capture;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod render;
pub mod session;
pub mod shortcut;
pub mod sketch;
mod tray;

use config::Settings;
use session::SessionState;

/// Entry point — called by Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();
    let accelerator = settings.toggle_shortcut.clone();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(shortcut::plugin())
        .manage(SessionState::new(settings))
        .invoke_handler(tauri::generate_handler![
            commands::get_scene,
            commands::background_png,
            commands::toggle_draw_mode,
            commands::set_mode,
            commands::set_color,
            commands::set_pen_size,
            commands::set_zoom,
            commands::toggle_panel,
            commands::pointer_down,
            commands::pointer_move,
            commands::pointer_up,
            commands::undo,
            commands::clear_canvas,
            commands::key_press,
            commands::save_png,
            commands::quit_app,
        ])
        .setup(move |app| {
            log::info!("Sketch Overlay starting up");

            tray::setup_tray(app.handle())?;
            shortcut::register(app.handle(), &accelerator);

            log::info!("System tray initialized — ready to draw");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("Error running Sketch Overlay");
}
