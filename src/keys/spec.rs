use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::keys::KeyId;
use crate::scene::{Light, ShadowConfig, SpotLight, color_from_hex};

/// Glow light placed under a key while its press animation plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLightSpec {
    /// `0xRRGGBB`
    pub color: u32,
    pub intensity: f32,
    /// `0.0` means unlimited range.
    #[serde(default)]
    pub distance: f32,
    pub decay: f32,
    pub position: [f32; 3],
}

impl PointLightSpec {
    #[must_use]
    pub fn to_light(&self) -> Light {
        Light::new_point(color_from_hex(self.color), self.intensity, self.distance, self.decay)
    }
}

/// Shadow-casting spotlight aimed at the centre of a key's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotLightSpec {
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    /// Radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub position: [f32; 3],
    pub shadow_map_size: u32,
    pub shadow_bias: f32,
}

impl SpotLightSpec {
    #[must_use]
    pub fn to_light(&self) -> Light {
        let spot = SpotLight {
            distance: self.distance,
            angle: self.angle,
            penumbra: self.penumbra,
            decay: self.decay,
            target: None,
        };
        Light::new_spot(color_from_hex(self.color), self.intensity, spot).with_shadows(ShadowConfig {
            bias: self.shadow_bias,
            map_size: self.shadow_map_size,
            ..ShadowConfig::default()
        })
    }

    fn key_spot(intensity: f32) -> Self {
        Self {
            color: 0xffffff,
            intensity,
            distance: 20.0,
            angle: 0.4,
            penumbra: 1.0,
            decay: 1.5,
            position: [5.0, 10.0, 0.0],
            shadow_map_size: 1024,
            shadow_bias: -0.0001,
        }
    }
}

/// Static description of one interactive key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    pub id: KeyId,
    /// Model path, relative to the asset root.
    pub asset: String,
    /// Exact name of the press clip inside the model.
    pub clip_name: String,
    /// Offset applied to the model root.
    pub position: [f32; 3],
    pub light: PointLightSpec,
    #[serde(default)]
    pub spotlight: Option<SpotLightSpec>,
    /// Seconds of fly-away before navigating.
    pub fly_threshold: f32,
    pub destination: String,
}

impl KeySpec {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[must_use]
    pub fn enter() -> Self {
        Self {
            id: KeyId::Enter,
            asset: "models/enter_key.glb".to_string(),
            clip_name: "key_enter.Action".to_string(),
            position: [8.8, -0.1, -28.0],
            light: PointLightSpec {
                color: 0xffff00,
                intensity: 100.0,
                distance: 0.0,
                decay: 2.5,
                position: [1.5, 1.9, -9.0],
            },
            spotlight: Some(SpotLightSpec::key_spot(500.0)),
            fly_threshold: 0.5,
            destination: "https://stilmant.dev/blog/".to_string(),
        }
    }

    #[must_use]
    pub fn f1() -> Self {
        Self {
            id: KeyId::F1,
            asset: "models/f1_key.glb".to_string(),
            clip_name: "f1_key.Action".to_string(),
            position: [0.0, -0.05, 0.0],
            light: PointLightSpec {
                color: 0xffff00,
                intensity: 10.0,
                distance: 0.0,
                decay: 2.5,
                position: [-3.9, 2.9, 14.3],
            },
            spotlight: None,
            fly_threshold: 1.0,
            destination: "https://stilmant.dev/auth/realms/Organization/protocol/openid-connect/auth?client_id=menu-page&redirect_uri=https://stilmant.dev/menu&response_type=code".to_string(),
        }
    }

    #[must_use]
    pub fn space() -> Self {
        Self {
            id: KeyId::Space,
            asset: "models/space_key.glb".to_string(),
            clip_name: "space_key.Action".to_string(),
            position: [0.0, -0.05, 0.0],
            light: PointLightSpec {
                color: 0xffff00,
                intensity: 50.0,
                distance: 0.0,
                decay: 2.5,
                position: [6.8, 1.4, 5.3],
            },
            spotlight: Some(SpotLightSpec::key_spot(175.0)),
            fly_threshold: 1.5,
            destination: "https://www.blenderkit.com/asset-gallery-detail/1db0380b-c09a-43e6-94e7-fc85cd580b79/?query=author_id:791292".to_string(),
        }
    }

    /// The three keys of the landing scene in priority order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::enter(), Self::f1(), Self::space()]
    }
}
