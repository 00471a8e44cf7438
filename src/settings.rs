//! Player and editor preferences
//!
//! Persisted separately from the world document in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::WORLD_PATH;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the world document is loaded from and saved to
    pub world_url: String,

    // === Camera ===
    /// Half-size of the view along the shorter screen axis
    pub camera_radius: f32,
    /// Half-life of the follow blend (s)
    pub camera_follow_half_life: f32,
    /// Time for the catch-up term to close any remaining gap (s)
    pub camera_catch_up_time: f32,

    // === Overlay ===
    /// Spacing of the background grid
    pub grid_step: f32,
    pub show_grid: bool,

    // === Editor ===
    pub start_in_edit_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_url: WORLD_PATH.to_string(),

            camera_radius: 10.0,
            camera_follow_half_life: 1.0,
            camera_catch_up_time: 5.0,

            grid_step: 0.75,
            show_grid: true,

            start_in_edit_mode: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "plankton_settings";

    /// Parse stored settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
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
