use glam::Vec3;

use crate::scene::NodeHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowConfig {
    pub bias: f32,
    pub normal_bias: f32,
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.005,
            normal_bias: 0.02,
            map_size: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Cut-off distance. `0.0` means unlimited.
    pub distance: f32,
    pub decay: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub distance: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    /// Fraction of the cone that is attenuated, in [0, 1].
    pub penumbra: f32,
    pub decay: f32,
    /// Node the spot aims at. `None` aims along the node's -Z axis.
    pub target: Option<NodeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Directional,
    Point(PointLight),
    Spot(SpotLight),
}

/// Light component attached to a scene node. Position and direction come
/// from the node's world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: ShadowConfig,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
            cast_shadows: false,
            shadow: ShadowConfig::default(),
        }
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point(PointLight { distance, decay }),
            cast_shadows: false,
            shadow: ShadowConfig::default(),
        }
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, spot: SpotLight) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Spot(spot),
            cast_shadows: false,
            shadow: ShadowConfig::default(),
        }
    }

    #[must_use]
    pub fn with_shadows(mut self, shadow: ShadowConfig) -> Self {
        self.cast_shadows = true;
        self.shadow = shadow;
        self
    }
}

/// Converts a `0xRRGGBB` value into a linear-ish RGB triple in [0, 1].
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
