//! Runtime settings
//!
//! Stored as JSON next to the binary (or wherever the first CLI argument
//! points). Missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TICK_MS};
use crate::sim::Arena;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Timing ===
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Fixed RNG seed; a random one is drawn when absent
    pub seed: Option<u64>,

    // === Persistence ===
    pub high_score_path: PathBuf,

    // === Demo ===
    /// Ticks the headless autopilot plays before exiting
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_ms: TICK_MS,
            seed: None,
            high_score_path: PathBuf::from("highscore.json"),
            // Ten simulated minutes
            demo_ticks: 10 * 60 * 1000 / TICK_MS,
        }
    }
}

impl Settings {
    pub fn arena(&self) -> Arena {
        Arena::new(self.screen_width, self.screen_height)
    }

    /// Load settings from `path`, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON. Returns whether the write succeeded.
    pub fn save(&self, path: &Path) -> bool {
        let result = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => {
                log::info!("Settings saved to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("Failed to save settings to {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Replace nonsensical values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.screen_width > 0.0) || !(self.screen_height > 0.0) {
            log::warn!(
                "Arena {}x{} is invalid, using {}x{}",
                self.screen_width,
                self.screen_height,
                defaults.screen_width,
                defaults.screen_height
            );
            self.screen_width = defaults.screen_width;
            self.screen_height = defaults.screen_height;
        }
        if self.tick_ms == 0 {
            log::warn!("tick_ms must be positive, using {}", defaults.tick_ms);
            self.tick_ms = defaults.tick_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.tick_ms, TICK_MS);
        assert_eq!(settings.arena(), Arena::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/squad_invaders_settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_values_sanitized() {
        let settings: Settings =
            serde_json::from_str(r#"{"screen_width": -5.0, "tick_ms": 0}"#).unwrap();
        let settings = settings.sanitized();
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
        assert_eq!(settings.tick_ms, TICK_MS);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "squad_invaders_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            seed: Some(99),
            demo_ticks: 10,
            ..Settings::default()
        };
        assert!(settings.save(&path));
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
