//! Screen capture domain — public API.
//!
//! External code should only use the functions exported here.

mod encode;
mod screenshot;

pub use encode::{encode_png, encode_png_base64, EncodeError};
pub use screenshot::{capture_primary_monitor, CaptureError};
