//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices. Kept
//! apart from [`Scene`](crate::scene::Scene) so it only borrows the node map
//! and the camera components.

use glam::Affine3A;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::node::Node;

/// Updates the world matrices of every node reachable from `roots`.
///
/// Iterative (explicit stack) so deep hierarchies cannot overflow the call
/// stack. A node's world matrix is only recomputed when its own TRS or one of
/// its ancestors changed.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SparseSecondaryMap<NodeHandle, Camera>,
    roots: &[NodeHandle],
) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }
    propagate(nodes, cameras, &mut stack);
}

/// Updates the subtree under `root`, taking its parent's current world
/// matrix as the starting point and forcing a refresh of the whole subtree.
pub fn update_subtree(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SparseSecondaryMap<NodeHandle, Camera>,
    root: NodeHandle,
) {
    let parent_world = nodes
        .get(root)
        .and_then(|n| n.parent)
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root, parent_world, true)];
    propagate(nodes, cameras, &mut stack);
}

fn propagate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SparseSecondaryMap<NodeHandle, Camera>,
    stack: &mut Vec<(NodeHandle, Affine3A, bool)>,
) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);

            if let Some(camera) = cameras.get_mut(node_handle) {
                camera.update_view_projection(&new_world);
            }
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}
