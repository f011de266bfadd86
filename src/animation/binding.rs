use crate::scene::NodeHandle;

/// The node property an animation track writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// `transform.position`
    Translation,
    /// `transform.rotation`
    Rotation,
    /// `transform.scale`
    Scale,
}

/// Maps track `track_index` of a clip onto a property of `node_handle`.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
