//! Game settings and preferences
//!
//! Persisted as JSON next to the high score file. A missing or unreadable
//! file falls back to defaults; settings never stop the game from starting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location for per-user files
pub fn data_dir() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    home.join(".invaders")
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Play sound effects at all
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Muted without losing the volume levels
    pub muted: bool,

    // === Player ===
    /// Name offered at the game-over prompt
    pub player_name: String,
    /// Where `name:score` records are kept
    pub high_score_path: PathBuf,

    // === HUD ===
    /// Show the current tick interval next to the score
    pub show_speed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            player_name: String::new(),
            high_score_path: data_dir().join("highscores.txt"),

            show_speed: false,
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> PathBuf {
        data_dir().join("settings.json")
    }

    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings {}: {} - using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to disk; failures are logged, not fatal
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(path, json)
            });
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings {}: {}", path.display(), e),
        }
    }

    /// Volume the audio worker should actually use
    pub fn effective_volume(&self) -> f32 {
        if !self.sound || self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}
