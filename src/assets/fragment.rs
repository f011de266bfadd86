use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::AnimationClip;
use crate::scene::{BoundingBox, Mesh, Node, NodeHandle, Scene};

/// One node of a loaded model, indexed by its position in
/// [`SceneFragment::nodes`].
#[derive(Debug, Clone)]
pub struct FragmentNode {
    pub name: String,
    pub parent: Option<usize>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<Mesh>,
}

impl FragmentNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
        }
    }
}

/// A model decoded off the main thread: a node hierarchy plus the named clips
/// that animate it. Plain data, `Send`, not yet part of any scene.
#[derive(Debug, Clone, Default)]
pub struct SceneFragment {
    pub name: String,
    /// Parents always precede their children.
    pub nodes: Vec<FragmentNode>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl SceneFragment {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            clips: Vec::new(),
        }
    }

    /// Appends a node and returns its index. `parent` must already exist.
    pub fn push_node(&mut self, mut node: FragmentNode, parent: Option<usize>) -> usize {
        node.parent = parent.filter(|&p| p < self.nodes.len());
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Shortcut for a named mesh node with the given local bounds.
    pub fn push_mesh(&mut self, name: &str, parent: Option<usize>, position: Vec3, bounds: BoundingBox) -> usize {
        let mut node = FragmentNode::new(name);
        node.position = position;
        node.mesh = Some(Mesh::new(name, bounds));
        self.push_node(node, parent)
    }

    pub fn push_clip(&mut self, clip: AnimationClip) {
        self.clips.push(Arc::new(clip));
    }

    #[must_use]
    pub fn find_clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        AnimationClip::find_by_name(&self.clips, name)
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    /// Inserts the fragment under a new root-level group node named after
    /// the fragment and returns that group.
    pub fn instantiate(&self, scene: &mut Scene) -> NodeHandle {
        let group = scene.create_node_with_name(&self.name);
        let mut handles: Vec<NodeHandle> = Vec::with_capacity(self.nodes.len());

        for fragment_node in &self.nodes {
            let mut node = Node::with_name(fragment_node.name.clone());
            node.transform.position = fragment_node.position;
            node.transform.rotation = fragment_node.rotation;
            node.transform.scale = fragment_node.scale;

            let parent = fragment_node
                .parent
                .and_then(|p| handles.get(p).copied())
                .unwrap_or(group);
            let handle = scene.add_to_parent(node, parent);

            if let Some(mesh) = &fragment_node.mesh {
                scene.set_mesh(handle, mesh.clone());
            }
            handles.push(handle);
        }

        group
    }
}
