//! Game settings and preferences
//!
//! Persisted as JSON next to the level data, separately from progress.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,
    /// Spawn thruster/force particles
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Music sits well under the effects by default
            music_volume: 0.25,
            sfx_volume: 1.0,
            muted: false,
            particles: true,
        }
    }
}

impl Settings {
    /// Load from disk; missing or unreadable files fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("settings file corrupt ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Effective volume for a sound effect cue
    pub fn effective_sfx(&self, volume_hint: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.sfx_volume * volume_hint).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rolleron_settings_{tag}_{}.json", std::process::id()))
    }

    #[test]
    fn test_round_trip() {
        let path = scratch("round_trip");
        let settings = Settings {
            music_volume: 0.5,
            sfx_volume: 0.75,
            muted: true,
            particles: false,
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_defaults() {
        assert_eq!(Settings::load("/nonexistent/rolleron.json"), Settings::default());
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let path = scratch("corrupt");
        std::fs::write(&path, "{not json").unwrap();
        let loaded = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx(1.0), 0.0);
    }
}
