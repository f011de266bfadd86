//! Shared fixtures: in-memory key models and a landing scene that frames
//! them from the front.

#![allow(dead_code)]

use glam::{Vec2, Vec3};

use keyportal::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use keyportal::assets::SceneFragment;
use keyportal::config::{CameraConfig, LandingConfig, OrbitConfig};
use keyportal::frame::FrameState;
use keyportal::keys::{KeyId, KeySpec};
use keyportal::navigation::RecordingNavigator;
use keyportal::render::HeadlessRenderer;
use keyportal::scene::BoundingBox;
use keyportal::{Landing, TickReport};

pub const PRESS_DURATION: f32 = 0.5;
pub const DT: f32 = 0.1;

/// A press clip that dips `node` and brings it back.
pub fn press_clip(name: &str, node: &str, duration: f32) -> AnimationClip {
    let track = KeyframeTrack::new(
        vec![0.0, duration * 0.5, duration],
        vec![Vec3::ZERO, Vec3::new(0.0, -0.2, 0.0), Vec3::ZERO],
        InterpolationMode::Linear,
    );
    AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: node.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(track),
        }],
    )
}

/// A one-cube key model carrying the press clip its spec expects.
pub fn key_fragment(spec: &KeySpec) -> SceneFragment {
    let mut fragment = SceneFragment::new(format!("{}_key", spec.id));
    fragment.push_mesh(
        "cap",
        None,
        Vec3::ZERO,
        BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
    );
    fragment.push_clip(press_clip(&spec.clip_name, "cap", PRESS_DURATION));
    fragment
}

pub fn key_fragment_without_clip(spec: &KeySpec) -> SceneFragment {
    let mut fragment = key_fragment(spec);
    fragment.clips.clear();
    fragment
}

/// Default key specs moved onto the x axis (Enter at -3, F1 at 0,
/// Space at +3) so each one is easy to aim at.
pub fn lined_up_keys() -> Vec<KeySpec> {
    let mut keys = KeySpec::defaults();
    for key in &mut keys {
        let x = match key.id {
            KeyId::Enter => -3.0,
            KeyId::F1 => 0.0,
            KeyId::Space => 3.0,
        };
        key.position = [x, 0.0, 0.0];
    }
    keys
}

/// Camera on +z looking at the origin, 800x600 viewport, no models.
pub fn test_config() -> LandingConfig {
    let mut config = LandingConfig {
        camera: CameraConfig {
            position: [0.0, 0.0, 10.0],
            fov: 60.0,
            near: 0.1,
            far: 100.0,
        },
        orbit: OrbitConfig {
            target: [0.0, 0.0, 0.0],
            ..OrbitConfig::default()
        },
        models: Vec::new(),
        keys: lined_up_keys(),
        ..LandingConfig::default()
    };
    config.window.width = 800;
    config.window.height = 600;
    config
}

pub type TestLanding = Landing<HeadlessRenderer, RecordingNavigator>;

/// Landing with every key model already in the scene.
pub fn populated_landing(config: LandingConfig) -> TestLanding {
    let specs = config.keys.clone();
    let mut landing = Landing::new(config, HeadlessRenderer::default(), RecordingNavigator::new());
    for spec in &specs {
        landing.on_asset_loaded(keyportal::AssetTag::Key(spec.id), &key_fragment(spec));
    }
    landing
}

/// Screen position of the middle of a lined-up key, for the 800x600 test
/// viewport.
pub fn key_cursor(id: KeyId) -> Vec2 {
    // At distance 10 with a 60 degree fov the half-height covers
    // 10 * tan(30deg) = 5.7735 world units.
    let half_height = 10.0 * 30f32.to_radians().tan();
    let half_width = half_height * 800.0 / 600.0;
    let x = match id {
        KeyId::Enter => -3.0,
        KeyId::F1 => 0.0,
        KeyId::Space => 3.0,
    };
    Vec2::new((x / half_width + 1.0) * 0.5 * 800.0, 300.0)
}

/// Fixed-step clock.
pub struct Clock {
    pub time: f32,
    pub frame: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self { time: 0.0, frame: 0 }
    }

    pub fn step(&mut self, dt: f32) -> FrameState {
        self.time += dt;
        self.frame += 1;
        FrameState {
            time: self.time,
            dt,
            frame_count: self.frame,
        }
    }
}

/// Ticks `landing` `frames` times, collecting the reports.
pub fn run_frames(landing: &mut TestLanding, clock: &mut Clock, frames: usize) -> Vec<TickReport> {
    (0..frames).map(|_| landing.update(clock.step(DT))).collect()
}
