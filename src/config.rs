//! Landing scene configuration
//!
//! [`LandingConfig::default`] is the shipped scene. A JSON file can override
//! any part of it; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::errors::{KeyportalError, Result};
use crate::frame::FlyAwayParams;
use crate::keys::{KeySpec, RetriggerPolicy};
use crate::render::RenderSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "keyportal".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [15.98, 9.41, -8.09],
            fov: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: [-2.8, -1.1, -9.0],
            enable_damping: false,
            damping_factor: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
    pub cast_shadow: bool,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 0.32,
            position: [2.0, 10.0, 8.0],
            cast_shadow: true,
        }
    }
}

/// A decorative model. With a `clip_name` the clip loops forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub asset: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub clip_name: Option<String>,
}

impl ModelConfig {
    #[must_use]
    pub fn message() -> Self {
        Self {
            asset: "models/message.glb".to_string(),
            position: [0.0, 0.0, -0.5],
            clip_name: Some("TextAction".to_string()),
        }
    }

    #[must_use]
    pub fn keyboard() -> Self {
        Self {
            asset: "models/keyboard.glb".to_string(),
            position: [0.0, 0.0, 0.0],
            clip_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// Directory (native) or base URL (wasm) the asset paths are relative to.
    pub asset_root: String,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub directional_light: DirectionalLightConfig,
    pub models: Vec<ModelConfig>,
    /// Interactive keys. Priority comes from the key id, not list order.
    pub keys: Vec<KeySpec>,
    pub retrigger: RetriggerPolicy,
    pub fly_away: FlyAwayParams,
    pub render: RenderSettings,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            asset_root: String::new(),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            directional_light: DirectionalLightConfig::default(),
            models: vec![ModelConfig::message(), ModelConfig::keyboard()],
            keys: KeySpec::defaults(),
            retrigger: RetriggerPolicy::default(),
            fly_away: FlyAwayParams::default(),
            render: RenderSettings::default(),
        }
    }
}

impl LandingConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Falls back to the defaults (and logs why) when the file is missing or
    /// invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Config {} not used ({err}), falling back to defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(KeyportalError::InvalidConfig(format!(
                "camera.fov must be in (0, 180), got {}",
                camera.fov
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(KeyportalError::InvalidConfig(format!(
                "camera planes must satisfy 0 < near < far, got near {} far {}",
                camera.near, camera.far
            )));
        }

        for (i, key) in self.keys.iter().enumerate() {
            if self.keys[..i].iter().any(|k| k.id == key.id) {
                return Err(KeyportalError::InvalidConfig(format!("key {} is configured twice", key.id)));
            }
            if key.fly_threshold < 0.0 {
                return Err(KeyportalError::InvalidConfig(format!(
                    "key {}: fly_threshold must not be negative",
                    key.id
                )));
            }
        }

        let lerp = self.fly_away.fov_lerp;
        if !(0.0..=1.0).contains(&lerp) {
            return Err(KeyportalError::InvalidConfig(format!(
                "fly_away.fov_lerp must be in [0, 1], got {lerp}"
            )));
        }

        Ok(())
    }
}
