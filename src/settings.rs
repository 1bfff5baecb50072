//! Game settings and preferences
//!
//! Persisted as JSON next to the game, separately from level progress.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// How much the diagnostics sink reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsLevel {
    /// Nothing is reported
    Off,
    /// Setup, collisions and the end-of-level summary
    #[default]
    Summary,
    /// Also per-frame positions and nearby obstacles
    Verbose,
}

impl DiagnosticsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticsLevel::Off => "off",
            DiagnosticsLevel::Summary => "summary",
            DiagnosticsLevel::Verbose => "verbose",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(DiagnosticsLevel::Off),
            "summary" => Some(DiagnosticsLevel::Summary),
            "verbose" | "all" => Some(DiagnosticsLevel::Verbose),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Diagnostics ===
    pub diagnostics: DiagnosticsLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            diagnostics: DiagnosticsLevel::Summary,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if the file is missing
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.clamped())
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Volumes forced into 0.0 - 1.0
    pub fn clamped(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("side_scroller_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = temp_path("round_trip");
        let settings = Settings {
            master_volume: 0.3,
            muted: true,
            diagnostics: DiagnosticsLevel::Verbose,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = Settings::load(&temp_path("missing")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.diagnostics, DiagnosticsLevel::Summary);
    }

    #[test]
    fn test_unknown_keys_dropped_on_save() {
        let settings: Settings =
            serde_json::from_str(r#"{"sfx_volume": 0.4, "music_volume": 0.7}"#).unwrap();
        assert_eq!(settings.sfx_volume, 0.4);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("music_volume"));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let path = temp_path("bad");
        fs::write(&path, "{ not json").unwrap();
        let result = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_diagnostics_level_from_str() {
        assert_eq!(DiagnosticsLevel::from_str("VERBOSE"), Some(DiagnosticsLevel::Verbose));
        assert_eq!(DiagnosticsLevel::from_str("none"), Some(DiagnosticsLevel::Off));
        assert_eq!(DiagnosticsLevel::from_str("loud"), None);
        assert_eq!(DiagnosticsLevel::Summary.as_str(), "summary");
    }

    #[test]
    fn test_loaded_volumes_clamped() {
        let path = temp_path("clamp");
        fs::write(&path, r#"{"master_volume": 4.0, "sfx_volume": -2.0}"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.master_volume, 1.0);
        assert_eq!(loaded.sfx_volume, 0.0);
    }
}
