//! Rendering seam
//!
//! The scene is drawn by an external backend implementing [`Renderer`].
//! [`RenderSettings`] carries the hints the backend should honour, and
//! [`HeadlessRenderer`] is the backend used when nothing draws to a screen.

use serde::{Deserialize, Serialize};

use crate::scene::{Camera, Scene};

/// Tone mapping curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMappingMode {
    /// No tone mapping (linear passthrough)
    Linear,
    /// ACES Filmic
    #[default]
    AcesFilmic,
}

/// Shadow map filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowFilter {
    Hard,
    #[default]
    PcfSoft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub tone_mapping: ToneMappingMode,
    /// Encode the final image as sRGB.
    pub srgb_output: bool,
    pub shadows: bool,
    pub shadow_filter: ShadowFilter,
    pub antialias: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMappingMode::AcesFilmic,
            srgb_output: true,
            shadows: true,
            shadow_filter: ShadowFilter::PcfSoft,
            antialias: true,
        }
    }
}

/// Rendering backend.
pub trait Renderer {
    /// Viewport size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame. World matrices are up to date when this is called.
    fn render(&mut self, scene: &Scene, camera: &Camera);
}

/// Backend that draws nothing and records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    pub settings: RenderSettings,
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    /// Visible lights in the last rendered frame.
    pub last_light_count: usize,
    /// Camera fov of the last rendered frame, degrees.
    pub last_fov: f32,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        self.frames += 1;
        self.last_light_count = scene.iter_active_lights().count();
        self.last_fov = camera.fov;
        log::trace!(
            "frame {}: {} nodes, {} lights, fov {:.2}",
            self.frames,
            scene.nodes.len(),
            self.last_light_count,
            camera.fov
        );
    }
}
