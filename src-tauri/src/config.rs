//! Startup settings.
//!
//! There is no config file. Values come from the process environment, with
//! an optional `.env` file loaded first. Bad values are logged and replaced
//! by defaults; configuration never stops the app from starting.

use crate::sketch::{Color, DEFAULT_PEN_SIZE, PEN_SIZE_RANGE};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PEN_SIZE: &str = "SKETCH_PEN_SIZE";
pub const ENV_COLOR: &str = "SKETCH_COLOR";
pub const ENV_CAPTURE_DELAY_MS: &str = "SKETCH_CAPTURE_DELAY_MS";
pub const ENV_TOGGLE_SHORTCUT: &str = "SKETCH_TOGGLE_SHORTCUT";
pub const ENV_EXPORT_DIR: &str = "SKETCH_EXPORT_DIR";

const DEFAULT_CAPTURE_DELAY_MS: u64 = 150;
const DEFAULT_TOGGLE_SHORTCUT: &str = "CmdOrCtrl+Shift+D";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pen_size: u32,
    pub color: Color,
    /// Time for the compositor to remove the hidden overlay before capturing.
    pub capture_delay: Duration,
    pub toggle_shortcut: String,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pen_size: DEFAULT_PEN_SIZE,
            color: Color::default(),
            capture_delay: Duration::from_millis(DEFAULT_CAPTURE_DELAY_MS),
            toggle_shortcut: DEFAULT_TOGGLE_SHORTCUT.to_string(),
            export_dir: default_export_dir(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: '{value}' is not a number")]
    NotANumber { key: &'static str, value: String },

    #[error("{key}: {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{key}: {source}")]
    Color {
        key: &'static str,
        #[source]
        source: crate::sketch::ColorError,
    },

    #[error("{key}: directory {} does not exist", path.display())]
    MissingDir { key: &'static str, path: PathBuf },
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[CONFIG] Loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let mut errors = Vec::new();

        if let Some(raw) = lookup(ENV_PEN_SIZE) {
            match parse_pen_size(&raw) {
                Ok(size) => settings.pen_size = size,
                Err(e) => errors.push(e),
            }
        }

        if let Some(raw) = lookup(ENV_COLOR) {
            match raw.parse::<Color>() {
                Ok(color) => settings.color = color,
                Err(source) => errors.push(ConfigError::Color { key: ENV_COLOR, source }),
            }
        }

        if let Some(raw) = lookup(ENV_CAPTURE_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => settings.capture_delay = Duration::from_millis(ms),
                Err(_) => errors.push(ConfigError::NotANumber {
                    key: ENV_CAPTURE_DELAY_MS,
                    value: raw,
                }),
            }
        }

        if let Some(raw) = lookup(ENV_TOGGLE_SHORTCUT).filter(|s| !s.trim().is_empty()) {
            settings.toggle_shortcut = raw.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_EXPORT_DIR) {
            let path = PathBuf::from(raw);
            if path.is_dir() {
                settings.export_dir = path;
            } else {
                errors.push(ConfigError::MissingDir { key: ENV_EXPORT_DIR, path });
            }
        }

        for e in &errors {
            log::warn!("[CONFIG] {} — using default", e);
        }
        settings
    }
}

fn parse_pen_size(raw: &str) -> Result<u32, ConfigError> {
    let value: u32 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        key: ENV_PEN_SIZE,
        value: raw.to_string(),
    })?;
    if !PEN_SIZE_RANGE.contains(&value) {
        return Err(ConfigError::OutOfRange {
            key: ENV_PEN_SIZE,
            value,
            min: *PEN_SIZE_RANGE.start(),
            max: *PEN_SIZE_RANGE.end(),
        });
    }
    Ok(value)
}

/// Pictures folder, then home, then the working directory.
fn default_export_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]), Settings::default());
    }

    #[test]
    fn valid_values_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();
        let s = settings_from(&[
            (ENV_PEN_SIZE, "12"),
            (ENV_COLOR, "#3498db"),
            (ENV_CAPTURE_DELAY_MS, "0"),
            (ENV_TOGGLE_SHORTCUT, "Alt+S"),
            (ENV_EXPORT_DIR, dir_str.as_str()),
        ]);
        assert_eq!(s.pen_size, 12);
        assert_eq!(s.color, "#3498db".parse().unwrap());
        assert_eq!(s.capture_delay, Duration::ZERO);
        assert_eq!(s.toggle_shortcut, "Alt+S");
        assert_eq!(s.export_dir, dir.path());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let s = settings_from(&[
            (ENV_PEN_SIZE, "99"),
            (ENV_COLOR, "red"),
            (ENV_CAPTURE_DELAY_MS, "soon"),
            (ENV_TOGGLE_SHORTCUT, "   "),
            (ENV_EXPORT_DIR, "/definitely/not/a/real/dir"),
        ]);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn pen_size_errors_name_the_problem() {
        assert!(matches!(parse_pen_size("abc"), Err(ConfigError::NotANumber { .. })));
        assert!(matches!(parse_pen_size("0"), Err(ConfigError::OutOfRange { .. })));
        assert_eq!(parse_pen_size(" 25 ").unwrap(), 25);
    }
}
