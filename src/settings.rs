//! Wheel settings and preferences
//!
//! JSON in LocalStorage on the web, where rate changes are written back.
//! Native reads an optional file.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{WheelConfig, WheelGeometry};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation and display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Buckets on the wheel at startup
    pub num_buckets: usize,
    /// Mass added to the bucket under the spout each tick
    pub fill_rate: f32,
    /// Mass each bucket drips per tick
    pub drain_rate: f32,
    /// Torque damping per tick, in [0, 1)
    pub friction: f32,
    /// New buckets start with up to this much mass
    pub initial_mass_max: f32,
    /// Fixed RNG seed; time-based when absent
    pub seed: Option<u64>,
    /// Animation period
    pub tick_interval_ms: u32,

    // === Layout ===
    /// Logical canvas edge length
    pub canvas_size: f32,
    /// Wheel radius as a fraction of the canvas
    pub radius_fraction: f32,
    /// Horizontal spout position
    pub spout_x: f32,
    /// Bucket base edge length before mass growth
    pub base_bucket_size: f32,

    // === Display ===
    /// Lines from each bucket to the hub
    pub show_spokes: bool,
    /// Rolling torque chart in the top-left corner
    pub show_chart: bool,
    /// Torque samples kept for the chart
    pub torque_history_len: usize,

    // === Native ===
    /// How long the headless native run animates
    pub headless_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_buckets: DEFAULT_NUM_BUCKETS,
            fill_rate: DEFAULT_FILL_RATE,
            drain_rate: DEFAULT_DRAIN_RATE,
            friction: DEFAULT_FRICTION,
            initial_mass_max: INITIAL_MASS_MAX,
            seed: None,
            tick_interval_ms: TICK_INTERVAL_MS,

            canvas_size: DEFAULT_CANVAS_SIZE,
            radius_fraction: WHEEL_RADIUS_FRACTION,
            spout_x: SPOUT_X,
            base_bucket_size: BASE_BUCKET_SIZE,

            show_spokes: true,
            show_chart: true,
            torque_history_len: TORQUE_HISTORY_LEN,

            headless_seconds: 3.0,
        }
    }
}

impl Settings {
    /// Wheel construction parameters; `fallback_seed` is used when no seed
    /// is configured
    pub fn wheel_config(&self, fallback_seed: u64) -> WheelConfig {
        WheelConfig {
            num_buckets: self.num_buckets,
            fill_rate: self.fill_rate,
            drain_rate: self.drain_rate,
            friction: self.friction,
            geometry: WheelGeometry {
                canvas_width: self.canvas_size,
                canvas_height: self.canvas_size,
                radius_fraction: self.radius_fraction,
                spout_x: self.spout_x,
            },
            base_bucket_size: self.base_bucket_size,
            initial_mass_max: self.initial_mass_max,
            torque_history_len: self.torque_history_len,
            seed: self.seed.unwrap_or(fallback_seed),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms.max(1)))
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "water_wheel_settings";

    /// Default native settings file
    pub const DEFAULT_FILE: &'static str = "waterwheel.json";

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

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the given path, else `waterwheel.json` if present, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&std::path::Path>) -> Self {
        let default_path = std::path::Path::new(Self::DEFAULT_FILE);
        let path = match path {
            Some(path) => path,
            None if default_path.exists() => default_path,
            None => {
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "num_buckets": 4, "fill_rate": 5.0 }"#).unwrap();
        assert_eq!(settings.num_buckets, 4);
        assert_eq!(settings.fill_rate, 5.0);
        assert_eq!(settings.drain_rate, DEFAULT_DRAIN_RATE);
        assert_eq!(settings.tick_interval_ms, TICK_INTERVAL_MS);
    }

    #[test]
    fn test_saved_json_loads_back() {
        let settings = Settings {
            fill_rate: 35.0,
            num_buckets: 12,
            seed: Some(9),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_wheel_config_uses_configured_seed() {
        let settings = Settings {
            seed: Some(77),
            canvas_size: 800.0,
            ..Default::default()
        };
        let config = settings.wheel_config(1);
        assert_eq!(config.seed, 77);
        assert_eq!(config.geometry.canvas_width, 800.0);
        assert_eq!(Settings::default().wheel_config(5).seed, 5);
    }

    #[test]
    fn test_tick_interval_never_zero() {
        let settings = Settings {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.tick_interval(), Duration::from_millis(1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::path::Path::new("definitely/not/here/waterwheel.json");
        assert!(matches!(Settings::load_from(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }
}
