//! Build script for Sketch Overlay.
//!
//! Only Tauri's own code generation (context, capabilities, icons) is needed.

fn main() {
    tauri_build::build();
}
