use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` against the subtree under `root`,
    /// matching tracks to nodes by name. Tracks whose node cannot be found
    /// are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            if let Some(node_handle) = scene.find_node_by_name(root, &track.meta.node_name) {
                bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                });
            } else {
                log::debug!(
                    "Clip '{}': no node named '{}' under the mixer root",
                    clip.name,
                    track.meta.node_name
                );
            }
        }

        bindings
    }
}
