use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A minimal scene node: name, hierarchy, transform and visibility.
///
/// Meshes, lights and cameras live in the [`Scene`](crate::scene::Scene)
/// component maps keyed by the node handle.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Hidden nodes (and lights attached to them) are skipped by the renderer.
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("")
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World transformation matrix, refreshed by the transform system.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
