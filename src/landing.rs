//! Landing Scene
//!
//! [`Landing`] owns everything the page is made of: the scene graph, the
//! three interactive keys, the decorative models, the camera controls and
//! the asset pipeline. It has no window of its own; a host feeds it input
//! and calls [`Landing::update`] once per displayed frame.
//!
//! # Lifecycle
//!
//! 1. [`Landing::new`] builds the static part of the scene (camera and
//!    directional light) from a [`LandingConfig`].
//! 2. [`Landing::request_assets`] starts loading every model in the
//!    background. Models appear in the scene as their loads complete, in
//!    any order.
//! 3. The host forwards input ([`Landing::handle_click`],
//!    [`Landing::handle_key`], [`Landing::resize`], [`Landing::input_mut`])
//!    and ticks [`Landing::update`].
//!
//! ```rust,ignore
//! let mut landing = Landing::new(config, HeadlessRenderer::default(), LogNavigator::new());
//! landing.request_assets()?;
//! loop {
//!     timer.tick();
//!     landing.update(FrameState::from_timer(&timer));
//! }
//! ```

use glam::{Vec2, Vec3};

use crate::animation::{AnimationMixer, LoopMode};
use crate::assets::{AssetEvent, AssetServer, SceneFragment};
use crate::config::{LandingConfig, ModelConfig};
use crate::dispatch::{InputDispatcher, KeyResponse};
use crate::errors::Result;
use crate::frame::{FrameContext, FrameScheduler, FrameState, TickReport};
use crate::input::{Input, Key};
use crate::keys::{KeyController, KeyId};
use crate::navigation::Navigator;
use crate::render::Renderer;
use crate::scene::{Camera, Light, NodeHandle, Scene, ShadowConfig, color_from_hex};
use crate::utils::OrbitControls;

/// What an asset request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetTag {
    /// Index into [`LandingConfig::models`].
    Model(usize),
    Key(KeyId),
}

pub struct Landing<R: Renderer, N: Navigator> {
    config: LandingConfig,
    scene: Scene,
    camera: NodeHandle,
    keys: Vec<KeyController>,
    /// One mixer per decorative model with a looping clip.
    ambient: Vec<AnimationMixer>,
    models: Vec<NodeHandle>,
    controls: OrbitControls,
    input: Input,
    scheduler: FrameScheduler,
    renderer: R,
    navigator: N,
    assets: Option<AssetServer<AssetTag>>,
    /// Time of the last update. Input between frames is stamped with it.
    now: f32,
}

impl<R: Renderer, N: Navigator> Landing<R, N> {
    /// Builds the scene skeleton. No asset is requested yet.
    pub fn new(config: LandingConfig, mut renderer: R, navigator: N) -> Self {
        let mut scene = Scene::new();

        let window = &config.window;
        let aspect = window.width as f32 / window.height.max(1) as f32;
        let cam = &config.camera;
        let target = Vec3::from_array(config.orbit.target);

        let camera = scene.add_camera(Camera::new_perspective(cam.fov, aspect, cam.near, cam.far));
        if let Some(node) = scene.get_node_mut(camera) {
            node.transform.position = Vec3::from_array(cam.position);
            node.transform.look_at(target, Vec3::Y);
        }

        let sun = &config.directional_light;
        let mut light = Light::new_directional(color_from_hex(sun.color), sun.intensity);
        if sun.cast_shadow && config.render.shadows {
            light = light.with_shadows(ShadowConfig::default());
        }
        let light = scene.add_light(light, "DirectionalLight");
        if let Some(node) = scene.get_node_mut(light) {
            node.transform.position = Vec3::from_array(sun.position);
            node.transform.look_at(Vec3::ZERO, Vec3::Y);
        }

        let keys = config
            .keys
            .iter()
            .cloned()
            .map(|spec| KeyController::new(spec, config.retrigger))
            .collect();

        let mut controls = OrbitControls::new(target);
        controls.enable_damping = config.orbit.enable_damping;
        controls.damping_factor = config.orbit.damping_factor;

        let mut input = Input::new();
        input.inject_resize(window.width, window.height);
        renderer.resize(window.width, window.height);

        scene.update_matrix_world();

        Self {
            scheduler: FrameScheduler::new(config.fly_away),
            config,
            scene,
            camera,
            keys,
            ambient: Vec::new(),
            models: Vec::new(),
            controls,
            input,
            renderer,
            navigator,
            assets: None,
            now: 0.0,
        }
    }

    /// Starts loading every configured model and key.
    pub fn request_assets(&mut self) -> Result<()> {
        let mut server = AssetServer::new(self.config.asset_root.clone())?;
        for (i, model) in self.config.models.iter().enumerate() {
            server.request(AssetTag::Model(i), &model.asset);
        }
        for key in &self.config.keys {
            server.request(AssetTag::Key(key.id), &key.asset);
        }
        self.assets = Some(server);
        Ok(())
    }

    /// Requests still on their way.
    #[must_use]
    pub fn pending_assets(&self) -> usize {
        self.assets.as_ref().map_or(0, AssetServer::in_flight)
    }

    /// Applies every asset completion that arrived since the last poll.
    pub fn poll_assets(&mut self) {
        let Some(server) = self.assets.as_mut() else {
            return;
        };
        for event in server.poll() {
            self.handle_asset_event(event);
        }
    }

    pub fn handle_asset_event(&mut self, event: AssetEvent<AssetTag>) {
        match event {
            AssetEvent::Loaded { tag, fragment } => self.on_asset_loaded(tag, &fragment),
            AssetEvent::Failed { tag, error } => match tag {
                AssetTag::Model(i) => {
                    let asset = self.config.models.get(i).map_or("?", |m| m.asset.as_str());
                    log::error!("Failed to load model '{asset}': {error}");
                }
                AssetTag::Key(id) => log::error!("Failed to load {id} key: {error}"),
            },
        }
    }

    /// Puts a loaded model into the scene. A fragment for a key that was
    /// never configured is dropped.
    pub fn on_asset_loaded(&mut self, tag: AssetTag, fragment: &SceneFragment) {
        match tag {
            AssetTag::Model(i) => {
                let Some(model) = self.config.models.get(i).cloned() else {
                    log::warn!("No model slot {i} for '{}'", fragment.name);
                    return;
                };
                self.place_model(&model, fragment);
            }
            AssetTag::Key(id) => match self.keys.iter_mut().find(|k| k.id() == id) {
                Some(key) => key.populate(&mut self.scene, fragment),
                None => log::warn!("{id} key is not configured, dropping '{}'", fragment.name),
            },
        }
    }

    fn place_model(&mut self, model: &ModelConfig, fragment: &SceneFragment) {
        let root = fragment.instantiate(&mut self.scene);
        if let Some(node) = self.scene.get_node_mut(root) {
            node.transform.position = Vec3::from_array(model.position);
        }
        self.scene.set_shadow_flags(root, true, true);
        self.scene.update_subtree(root);
        self.models.push(root);

        let Some(clip_name) = &model.clip_name else {
            return;
        };
        let Some(clip) = fragment.find_clip(clip_name) else {
            log::warn!(
                "Clip '{clip_name}' not found in '{}' (available: {:?})",
                fragment.name,
                fragment.clip_names()
            );
            return;
        };

        let mut mixer = AnimationMixer::new(root);
        let handle = mixer.clip_action(clip, &self.scene);
        if let Some(action) = mixer.action_mut(handle) {
            action.set_loop(LoopMode::Loop).play();
        }
        self.ambient.push(mixer);
    }

    /// A primary click at `cursor` (window pixels, origin top-left).
    pub fn handle_click(&mut self, cursor: Vec2) -> Vec<KeyId> {
        self.scene.update_matrix_world();
        let Some(camera) = self.scene.main_camera().cloned() else {
            return Vec::new();
        };
        let viewport = self.input.screen_size();
        InputDispatcher::on_click(&mut self.scene, &camera, cursor, viewport, &mut self.keys, self.now)
    }

    pub fn handle_key(&mut self, key: Key) -> KeyResponse {
        InputDispatcher::on_key(key, &mut self.scene, &mut self.keys, self.now)
    }

    /// Keeps the camera aspect and the render target in step with the
    /// window. A zero-sized window (minimized) is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some((_, camera)) = self.scene.query_main_camera_bundle() {
            camera.aspect = width as f32 / height as f32;
            camera.update_projection_matrix();
        }
        self.renderer.resize(width, height);
        self.input.inject_resize(width, height);
    }

    /// One displayed frame.
    pub fn update(&mut self, frame: FrameState) -> TickReport {
        self.now = frame.time;
        self.poll_assets();

        let report = self.scheduler.tick(
            FrameContext {
                scene: &mut self.scene,
                keys: &mut self.keys,
                ambient: &mut self.ambient,
                controls: Some(&mut self.controls),
                input: &self.input,
                renderer: &mut self.renderer,
                navigator: &mut self.navigator,
            },
            frame,
        );

        self.input.start_frame();
        report
    }

    #[must_use]
    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera_node(&self) -> NodeHandle {
        self.camera
    }

    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        self.scene.main_camera()
    }

    #[must_use]
    pub fn keys(&self) -> &[KeyController] {
        &self.keys
    }

    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&KeyController> {
        self.keys.iter().find(|k| k.id() == id)
    }

    /// Roots of the decorative models loaded so far.
    #[must_use]
    pub fn models(&self) -> &[NodeHandle] {
        &self.models
    }

    #[must_use]
    pub fn ambient_mixers(&self) -> &[AnimationMixer] {
        &self.ambient
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Time of the last [`update`](Self::update).
    #[must_use]
    pub fn now(&self) -> f32 {
        self.now
    }
}
