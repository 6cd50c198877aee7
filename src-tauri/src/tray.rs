//! System tray setup and click handler.
//!
//! Left-click toggles drawing mode; the menu offers the same plus panel
//! visibility and Quit.

use crate::actions;
use crate::session::SessionState;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Manager,
};

pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let toggle_item = MenuItemBuilder::with_id("toggle", "Start/Stop Drawing").build(app)?;
    let panel_item = MenuItemBuilder::with_id("panel", "Show/Hide Panel").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit Sketch Overlay").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&toggle_item)
        .item(&panel_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("Sketch Overlay — Click to draw")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                button_state: tauri::tray::MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("[TRAY] Icon clicked — toggling drawing mode");
                actions::spawn_toggle_drawing(tray_icon.app_handle());
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "toggle" => actions::spawn_toggle_drawing(app),
            "panel" => {
                let state = app.state::<SessionState>();
                match state.with(|s| s.toggle_panel()) {
                    Ok(visible) => log::info!("[TRAY] Panel visible: {}", visible),
                    Err(e) => log::error!("[TRAY] {}", e),
                }
                actions::emit_scene(app);
            }
            "quit" => {
                log::info!("[TRAY] Quit requested from tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}
