use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{ActionHandle, AnimationMixer, LoopMode, MixerEvent};
use crate::assets::SceneFragment;
use crate::keys::{KeyId, KeySpec};
use crate::scene::{LightKind, Node, NodeHandle, Ray, Scene};

/// Whether the press animation is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Playing,
}

/// Fly-away latch. Only ever moves forward:
/// `Grounded -> Armed -> Departed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlyState {
    Grounded,
    /// The press animation finished at `started_at`; the camera is flying.
    Armed { started_at: f32 },
    /// Navigation has been requested. Still flying until the page goes away.
    Departed { started_at: f32 },
}

impl FlyState {
    #[must_use]
    pub fn started_at(self) -> Option<f32> {
        match self {
            FlyState::Grounded => None,
            FlyState::Armed { started_at } | FlyState::Departed { started_at } => Some(started_at),
        }
    }

    #[must_use]
    pub fn is_airborne(self) -> bool {
        !matches!(self, FlyState::Grounded)
    }
}

/// What a trigger does while the press animation is still playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetriggerPolicy {
    /// Restart the clip from zero. Only the last run reports completion.
    #[default]
    Restart,
    /// Drop the trigger.
    Ignore,
}

/// Runtime state of one interactive key.
///
/// Built from its [`KeySpec`] before any asset exists; every operation is a
/// silent no-op until [`populate`](Self::populate) receives the model.
pub struct KeyController {
    spec: KeySpec,
    policy: RetriggerPolicy,

    mesh: Option<NodeHandle>,
    mixer: Option<AnimationMixer>,
    action: Option<ActionHandle>,
    light: Option<NodeHandle>,
    spotlight: Option<NodeHandle>,

    playback: Playback,
    fly: FlyState,
}

impl KeyController {
    #[must_use]
    pub fn new(spec: KeySpec, policy: RetriggerPolicy) -> Self {
        Self {
            spec,
            policy,
            mesh: None,
            mixer: None,
            action: None,
            light: None,
            spotlight: None,
            playback: Playback::Idle,
            fly: FlyState::Grounded,
        }
    }

    #[must_use]
    pub fn id(&self) -> KeyId {
        self.spec.id
    }

    #[must_use]
    pub fn spec(&self) -> &KeySpec {
        &self.spec
    }

    #[must_use]
    pub fn mesh(&self) -> Option<NodeHandle> {
        self.mesh
    }

    #[must_use]
    pub fn light(&self) -> Option<NodeHandle> {
        self.light
    }

    #[must_use]
    pub fn spotlight(&self) -> Option<NodeHandle> {
        self.spotlight
    }

    #[must_use]
    pub fn action(&self) -> Option<ActionHandle> {
        self.action
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    #[must_use]
    pub fn fly(&self) -> FlyState {
        self.fly
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.mesh.is_some()
    }

    /// Inserts the key's model and its lights into `scene` and binds the
    /// press clip. A model without the clip still shows up but never reacts.
    pub fn populate(&mut self, scene: &mut Scene, fragment: &SceneFragment) {
        if self.is_populated() {
            log::warn!("{} key already populated, ignoring '{}'", self.spec.id, fragment.name);
            return;
        }

        let root = fragment.instantiate(scene);
        if let Some(node) = scene.get_node_mut(root) {
            node.transform.position = self.spec.position();
        }
        scene.set_shadow_flags(root, true, true);
        scene.update_subtree(root);

        // Glow light, hidden until the key is pressed.
        let light = scene.add_light(self.spec.light.to_light(), &format!("{}KeyLight", self.spec.id));
        if let Some(node) = scene.get_node_mut(light) {
            node.transform.position = Vec3::from_array(self.spec.light.position);
            node.visible = false;
        }

        if let Some(spot_spec) = &self.spec.spotlight {
            let center = scene
                .world_bounds_of(root)
                .map_or_else(|| self.spec.position(), |b| b.center());

            let mut target = Node::with_name(format!("{}SpotlightTarget", self.spec.id));
            target.transform.position = center;
            let target = scene.add_node(target);

            let mut spot_light = spot_spec.to_light();
            if let LightKind::Spot(spot) = &mut spot_light.kind {
                spot.target = Some(target);
            }
            let spot = scene.add_light(spot_light, &format!("{}Spotlight", self.spec.id));
            if let Some(node) = scene.get_node_mut(spot) {
                node.transform.position = Vec3::from_array(spot_spec.position);
                node.transform.look_at(center, Vec3::Y);
            }
            self.spotlight = Some(spot);
        }

        let mut mixer = AnimationMixer::new(root);
        match fragment.find_clip(&self.spec.clip_name) {
            Some(clip) => {
                let handle = mixer.clip_action(clip, scene);
                if let Some(action) = mixer.action_mut(handle) {
                    action.set_loop(LoopMode::Once).clamp_when_finished = true;
                }
                self.action = Some(handle);
            }
            None => log::warn!(
                "{} key: clip '{}' not found in '{}' (available: {:?})",
                self.spec.id,
                self.spec.clip_name,
                fragment.name,
                fragment.clip_names()
            ),
        }

        self.mesh = Some(root);
        self.light = Some(light);
        self.mixer = Some(mixer);

        log::info!("{} key ready", self.spec.id);
    }

    /// Plays the press animation and lights the key up.
    ///
    /// Returns `false` when nothing happened: no model or clip yet, or a
    /// re-trigger dropped by [`RetriggerPolicy::Ignore`].
    pub fn trigger(&mut self, scene: &mut Scene, now: f32) -> bool {
        let (Some(mixer), Some(handle)) = (self.mixer.as_mut(), self.action) else {
            return false;
        };
        if self.playback == Playback::Playing && self.policy == RetriggerPolicy::Ignore {
            log::debug!("{} key already playing, trigger ignored", self.spec.id);
            return false;
        }
        let Some(action) = mixer.action_mut(handle) else {
            return false;
        };

        action.reset().set_loop(LoopMode::Once).play();
        action.clamp_when_finished = true;

        if let Some(light) = self.light {
            scene.set_visible(light, true);
        }
        self.playback = Playback::Playing;

        log::debug!("{} key triggered at {now:.3}s", self.spec.id);
        true
    }

    /// Completion of the press animation: light off, fly-away armed (only
    /// the first time).
    pub fn on_animation_finished(&mut self, scene: &mut Scene, now: f32) {
        if let Some(light) = self.light {
            scene.set_visible(light, false);
        }
        if self.fly == FlyState::Grounded {
            self.fly = FlyState::Armed { started_at: now };
            log::debug!("{} key fly-away armed at {now:.3}s", self.spec.id);
        }
        self.playback = Playback::Idle;
    }

    /// Advances the key's mixer by `dt` and handles its completion events.
    pub fn advance(&mut self, scene: &mut Scene, dt: f32, now: f32) {
        let press = self.action;
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        mixer.update(dt, scene);

        let finished = mixer
            .drain_events()
            .filter(|event| matches!(event, MixerEvent::Finished { action } if Some(*action) == press))
            .count();

        if finished > 0 && self.playback == Playback::Playing {
            self.on_animation_finished(scene, now);
        }
    }

    /// Seconds since the fly-away was armed.
    #[must_use]
    pub fn fly_elapsed(&self, now: f32) -> Option<f32> {
        self.fly.started_at().map(|started_at| now - started_at)
    }

    /// `Armed -> Departed` once the elapsed fly time exceeds the key's
    /// threshold. Returns the destination exactly once.
    pub fn try_depart(&mut self, now: f32) -> Option<&str> {
        let FlyState::Armed { started_at } = self.fly else {
            return None;
        };
        if now - started_at > self.spec.fly_threshold {
            self.fly = FlyState::Departed { started_at };
            Some(&self.spec.destination)
        } else {
            None
        }
    }

    /// Nearest hit between `ray` and the key's model.
    ///
    /// Each mesh is tested as its oriented bounding box, not its triangles.
    /// A non-convex cap (the L-shaped Enter key) therefore also answers
    /// clicks in the empty corner of its box.
    #[must_use]
    pub fn hit_test(&self, scene: &Scene, ray: &Ray) -> Option<f32> {
        scene.intersect_hierarchy(self.mesh?, ray)
    }
}
