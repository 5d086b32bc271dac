//! Bar size settings and their JSON file.
//!
//! File format: `{ "width": 0, "height": 30 }`, where a width of `0` means
//! "full screen width". Missing keys take their defaults, so a partial file is
//! merged over `BarSettings::default()`.
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default bar height in pixels.
pub const DEFAULT_HEIGHT: u32 = 30;
/// Smallest bar height; lower values are raised to it.
pub const MIN_HEIGHT: u32 = 20;

/// Persisted bar dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSettings {
    /// Bar width in pixels; `0` spans the whole screen.
    pub width: u32,
    /// Bar height in pixels.
    pub height: u32,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            width: 0,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl BarSettings {
    /// Read a settings file. Heights below `MIN_HEIGHT` are raised to it.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mut settings: Self = serde_json::from_slice(&bytes)?;
        settings.height = settings.height.max(MIN_HEIGHT);
        Ok(settings)
    }

    /// Read a settings file, substituting defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                debug!("Settings {} unavailable ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write the settings, logging and otherwise ignoring failures.
    pub fn save_or_warn(&self, path: &Path) {
        if let Err(e) = self.save(path) {
            warn!("Failed to save settings to {}: {}", path.display(), e);
        }
    }

    /// Whether the bar spans the whole screen width.
    pub fn is_full_width(&self) -> bool {
        self.width == 0
    }

    /// Validate raw size-dialog input.
    ///
    /// Negative widths clamp to `0` (full width) and heights clamp up to
    /// `MIN_HEIGHT`. Returns `None` when either field is not an integer.
    pub fn from_form(width: &str, height: &str) -> Option<Self> {
        let width: i64 = width.trim().parse().ok()?;
        let height: i64 = height.trim().parse().ok()?;
        Some(Self {
            width: u32::try_from(width.max(0)).unwrap_or(u32::MAX),
            height: u32::try_from(height.max(i64::from(MIN_HEIGHT))).unwrap_or(u32::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_merges_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "height": 44 }"#).unwrap();
        let settings = BarSettings::load_or_default(&path);
        assert_eq!(settings, BarSettings { width: 0, height: 44 });
        assert!(settings.is_full_width());
    }

    #[test]
    fn stored_height_below_minimum_is_raised() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "width": 640, "height": 5 }"#).unwrap();
        assert_eq!(
            BarSettings::load(&path).unwrap(),
            BarSettings { width: 640, height: MIN_HEIGHT }
        );
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "width": "wide" }"#).unwrap();
        assert_eq!(BarSettings::load_or_default(&path), BarSettings::default());
        assert_eq!(
            BarSettings::load_or_default(&temp.path().join("absent.json")),
            BarSettings::default()
        );
    }

    #[test]
    fn save_then_load_returns_same_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let settings = BarSettings { width: 1024, height: 36 };
        settings.save(&path).unwrap();
        assert_eq!(BarSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn save_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        BarSettings::default().save_or_warn(&temp.path().join("no").join("settings.json"));
    }

    #[test]
    fn form_input_is_clamped() {
        assert_eq!(
            BarSettings::from_form(" -5 ", "3"),
            Some(BarSettings { width: 0, height: MIN_HEIGHT })
        );
        assert_eq!(
            BarSettings::from_form("800", "40"),
            Some(BarSettings { width: 800, height: 40 })
        );
        assert_eq!(BarSettings::from_form("abc", "40"), None);
        assert_eq!(BarSettings::from_form("800", ""), None);
    }
}
