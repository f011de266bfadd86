use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{ActionTransition, AnimationAction};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

/// Notifications produced while a mixer advances its actions.
///
/// Events are queued during [`AnimationMixer::update`] and drained by the
/// owner afterwards, so no callback ever runs while the mixer is borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerEvent {
    /// A `Once` action reached the end of its clip.
    Finished { action: ActionHandle },
    /// A looping action wrapped around.
    Looped { action: ActionHandle },
}

/// Drives the actions bound to one object hierarchy.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionHandle, AnimationAction>,
    events: Vec<MixerEvent>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            events: Vec::new(),
        }
    }

    /// Root node whose subtree the clips are bound against.
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Returns the action playing `clip` on this mixer's root, creating and
    /// binding it on first use.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        if let Some(handle) = self.find_action(&clip.name) {
            return handle;
        }

        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = Binder::bind(scene, self.root, clip);
        self.actions.insert(action)
    }

    /// Finds an existing action by clip name.
    #[must_use]
    pub fn find_action(&self, clip_name: &str) -> Option<ActionHandle> {
        self.actions
            .iter()
            .find(|(_, action)| action.clip().name == clip_name)
            .map(|(handle, _)| handle)
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    /// Names of all clips that have an action on this mixer.
    #[must_use]
    pub fn list_animations(&self) -> Vec<String> {
        self.actions.values().map(|a| a.clip().name.clone()).collect()
    }

    /// Resets and plays the action for `clip_name`, if one exists.
    pub fn play(&mut self, clip_name: &str) -> Option<ActionHandle> {
        let handle = self.find_action(clip_name)?;
        if let Some(action) = self.actions.get_mut(handle) {
            action.reset().play();
        }
        Some(handle)
    }

    /// Advances every action by `dt`, writes the sampled values into the
    /// bound scene nodes and queues transition events.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for (handle, action) in &mut self.actions {
            match action.update(dt) {
                Some(ActionTransition::Finished) => self.events.push(MixerEvent::Finished { action: handle }),
                Some(ActionTransition::Looped) => self.events.push(MixerEvent::Looped { action: handle }),
                None => {}
            }
        }

        for action in self.actions.values_mut() {
            if !action.is_influencing() {
                continue;
            }
            apply_action(action, scene);
        }
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, MixerEvent> {
        self.events.drain(..)
    }

    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

fn apply_action(action: &mut AnimationAction, scene: &mut Scene) {
    let time = action.sample_time();
    let clip = Arc::clone(action.clip());

    for binding in &action.bindings {
        let Some(track) = clip.tracks.get(binding.track_index) else {
            continue;
        };
        let Some(cursor) = action.track_cursors.get_mut(binding.track_index) else {
            continue;
        };
        let Some(node) = scene.get_node_mut(binding.node_handle) else {
            continue;
        };

        match (&track.data, binding.target) {
            (TrackData::Vector3(t), TargetPath::Translation) => {
                if let Some(value) = t.sample_with_cursor(time, cursor) {
                    node.transform.position = value;
                }
            }
            (TrackData::Vector3(t), TargetPath::Scale) => {
                if let Some(value) = t.sample_with_cursor(time, cursor) {
                    node.transform.scale = value;
                }
            }
            (TrackData::Quaternion(t), TargetPath::Rotation) => {
                if let Some(value) = t.sample_with_cursor(time, cursor) {
                    node.transform.rotation = value;
                }
            }
            _ => {}
        }
    }
}
