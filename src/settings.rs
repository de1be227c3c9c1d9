//! Player settings and preferences
//!
//! Persisted as one JSON blob in the settings store.

use serde::{Deserialize, Serialize};

use crate::persistence::SettingsStore;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Trail and spark emission on flying snowballs
    pub trails: bool,
    /// Secondary debris particles on burst
    pub secondary_particles: bool,
    /// Splat decals on surfaces
    pub splats: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            secondary_particles: true,
            splats: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Store key
    const STORAGE_KEY: &'static str = "snowtoss_settings";

    /// Flip trail effects on or off; returns the new value
    pub fn toggle_trails(&mut self) -> bool {
        self.trails = !self.trails;
        self.trails
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn SettingsStore) -> Self {
        if let Some(json) = store.get_string(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Stored settings unreadable: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn SettingsStore) {
        let result = serde_json::to_string(self)
            .map_err(crate::persistence::StoreError::from)
            .and_then(|json| store.set_string(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
