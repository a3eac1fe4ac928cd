//! Arcade settings and preferences
//!
//! Persisted as JSON: LocalStorage in the browser, a file named by
//! `SANTA_ARCADE_SETTINGS` on native.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::sim::state::Modes;

/// Arcade settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeSettings {
    /// Fixed RNG seed for reproducible runs (random if absent)
    pub seed: Option<u64>,

    // === Runner rules ===
    /// Falling into a gap is narrated instead of fatal
    pub superman_mode: bool,
    /// Hitting an obstacle is narrated instead of fatal
    pub ghost_mode: bool,

    // === Maze ===
    /// Steer the maze with the face zone classifier
    pub face_control: bool,
    /// Ticks between replayed presses while a touch button is held
    pub touch_repeat_ticks: u32,

    // === Camera overlay ===
    /// Draw detector output over the video
    pub show_face: bool,
}

impl Default for ArcadeSettings {
    fn default() -> Self {
        Self {
            seed: None,
            superman_mode: true,
            ghost_mode: false,
            face_control: false,
            touch_repeat_ticks: 10,
            show_face: false,
        }
    }
}

impl ArcadeSettings {
    /// Runner rule relaxations from these settings
    pub fn modes(&self) -> Modes {
        Modes {
            superman: self.superman_mode,
            ghost: self.ghost_mode,
        }
    }

    /// Configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }

    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "santa_arcade_settings";

    /// Environment variable naming the native settings file
    pub const PATH_VAR: &'static str = "SANTA_ARCADE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }

    /// Load settings from the file named by `SANTA_ARCADE_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to the file named by `SANTA_ARCADE_SETTINGS`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let Ok(path) = std::env::var(Self::PATH_VAR) else {
            return;
        };
        match self.save_to(std::path::Path::new(&path)) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, ArcadeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ArcadeError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ArcadeSettings::default();
        assert!(settings.superman_mode);
        assert!(!settings.ghost_mode);
        assert_eq!(settings.touch_repeat_ticks, 10);
        assert_eq!(settings.modes(), Modes::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = ArcadeSettings::from_json(r#"{"ghost_mode": true, "seed": 9}"#).unwrap();
        assert!(settings.ghost_mode);
        assert!(settings.superman_mode);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.resolve_seed(), 9);
    }

    #[test]
    fn test_bad_json_is_a_settings_error() {
        let err = ArcadeSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, ArcadeError::Settings(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("santa-arcade-settings-{}.json", std::process::id()));
        let settings = ArcadeSettings {
            face_control: true,
            touch_repeat_ticks: 4,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(ArcadeSettings::load_from(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(ArcadeSettings::load_from(&path), Err(ArcadeError::Io(_))));
    }
}
