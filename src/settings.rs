//! Player preferences
//!
//! Persisted in LocalStorage. Only preferences live here; game progress is
//! never saved.

use serde::{Deserialize, Serialize};

use crate::sim::AudioSettings;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Music volume (0.0 - 1.0), applied on top of each track's own level
    pub music_volume: f32,
    /// All sound off (toggled in game with M)
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Audio preferences handed to the simulation
    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings {
            muted: self.muted,
            music_volume: self.music_volume.clamp(0.0, 1.0),
        }
    }

    /// Take back preferences the simulation may have changed
    pub fn update_from(&mut self, audio: &AudioSettings) {
        self.muted = audio.muted;
        self.music_volume = audio.music_volume;
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bg_symbols_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
            && let Ok(settings) = serde_json::from_str(&json)
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
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

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamped_for_sim() {
        let settings = Settings {
            music_volume: 3.0,
            muted: true,
        };
        let audio = settings.audio_settings();
        assert_eq!(audio.music_volume, 1.0);
        assert!(audio.muted);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(json, r#"{"music_volume":1.0,"muted":false}"#);
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Settings::default());
    }
}
