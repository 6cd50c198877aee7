//! Modal messages for the user.
//!
//! Every user-facing failure ends here: logged, then shown as a native
//! message box. Nothing is retried and nothing is fatal.

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

pub fn error(app: &AppHandle, message: impl Into<String>) {
    let message = message.into();
    log::error!("[NOTIFY] {}", message);
    show(app, "Error", message, MessageDialogKind::Error);
}

pub fn warning(app: &AppHandle, message: impl Into<String>) {
    let message = message.into();
    log::warn!("[NOTIFY] {}", message);
    show(app, "Warning", message, MessageDialogKind::Warning);
}

pub fn info(app: &AppHandle, message: impl Into<String>) {
    show(app, "Success", message.into(), MessageDialogKind::Info);
}

fn show(app: &AppHandle, title: &str, message: String, kind: MessageDialogKind) {
    app.dialog()
        .message(message)
        .title(title)
        .kind(kind)
        .show(|_| {});
}
