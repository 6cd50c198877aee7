//! Pen colours and the swatch palette.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alpha applied to the pen while the highlighter is active.
pub const HIGHLIGHTER_ALPHA: u8 = 100;

pub const OPAQUE: u8 = 255;

/// Swatches offered by the control panel, in display order (two per row).
pub const PALETTE: [&str; 10] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#34495e", "#ffffff",
    "#f1c40f", "#e91e63",
];

/// RGBA colour with straight (non-premultiplied) alpha.
///
/// Crosses the frontend boundary as a CSS hex string (`#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgba(0xe7, 0x4c, 0x3c, OPAQUE)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Invalid colour '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidHex(String),
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { OPAQUE };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The palette parsed into colours.
pub fn palette() -> Vec<Color> {
    PALETTE.iter().filter_map(|hex| hex.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex_as_opaque() {
        let c: Color = "#3498db".parse().unwrap();
        assert_eq!(c, Color::rgba(0x34, 0x98, 0xdb, 255));
    }

    #[test]
    fn parses_eight_digit_hex_with_alpha() {
        let c: Color = "#3498db64".parse().unwrap();
        assert_eq!(c.a, 100);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["3498db", "#34", "#zzzzzz", "#3498db6", "", "#ééé", "#+1+2+3", "#+1+2+3+4"] {
            assert!(bad.parse::<Color>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn hex_round_trips_through_serde() {
        let c = Color::rgba(1, 2, 3, 4);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn palette_has_ten_opaque_swatches() {
        let colors = palette();
        assert_eq!(colors.len(), 10);
        assert!(colors.iter().all(|c| c.a == OPAQUE));
    }

    #[test]
    fn default_is_first_swatch() {
        assert_eq!(Color::default(), PALETTE[0].parse().unwrap());
    }
}
