use glam::Affine3A;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::{BoundingBox, Mesh};
use crate::scene::node::Node;
use crate::scene::raycast::{Ray, ray_hit_obb};
use crate::scene::transform::Transform;
use crate::scene::transform_system;

/// Scene graph
///
/// Pure data: the node hierarchy plus mesh, light and camera components keyed
/// by the owning node. Rendering reads it, it never talks to the GPU.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // Components
    pub meshes: SparseSecondaryMap<NodeHandle, Mesh>,
    pub cameras: SparseSecondaryMap<NodeHandle, Camera>,
    pub lights: SparseSecondaryMap<NodeHandle, Light>,

    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SparseSecondaryMap::new(),
            cameras: SparseSecondaryMap::new(),
            lights: SparseSecondaryMap::new(),
            active_camera: None,
        }
    }

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            log::error!("Parent node not found, adding child at the root instead");
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Removes a node, its whole subtree and their components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(parent) = self.nodes.get(handle).map(|n| n.parent) else {
            return;
        };

        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(pos) = p.children.iter().position(|&x| x == handle)
                {
                    p.children.remove(pos);
                }
            }
            None => {
                if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
                    self.root_nodes.remove(pos);
                }
            }
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
            self.meshes.remove(current);
            self.cameras.remove(current);
            self.lights.remove(current);
            if self.active_camera == Some(current) {
                self.active_camera = None;
            }
        }
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        let old_parent = self.nodes[child].parent;
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        self.nodes[parent].children.push(child);
        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.transform.mark_dirty();
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first search for a node called `name` in the subtree rooted at
    /// `root`, `root` included.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// All handles in the subtree rooted at `root`, parents before children.
    #[must_use]
    pub fn subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.visible = visible;
        }
    }

    /// `false` for unknown handles.
    #[must_use]
    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(|n| n.visible)
    }

    // === Components ===

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        if self.nodes.contains_key(handle) {
            self.meshes.insert(handle, mesh);
        }
    }

    /// Sets the shadow flags of every mesh in the subtree rooted at `root`.
    pub fn set_shadow_flags(&mut self, root: NodeHandle, cast: bool, receive: bool) {
        for handle in self.subtree(root) {
            if let Some(mesh) = self.meshes.get_mut(handle) {
                mesh.cast_shadow = cast;
                mesh.receive_shadow = receive;
            }
        }
    }

    pub fn add_light(&mut self, light: Light, name: &str) -> NodeHandle {
        let handle = self.create_node_with_name(name);
        self.lights.insert(handle, light);
        handle
    }

    #[must_use]
    pub fn light(&self, handle: NodeHandle) -> Option<&Light> {
        self.lights.get(handle)
    }

    /// Adds a camera node. The first camera added becomes the active one.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let handle = self.create_node_with_name("Camera");
        self.cameras.insert(handle, camera);
        if self.active_camera.is_none() {
            self.active_camera = Some(handle);
        }
        handle
    }

    /// Transform and camera of the active camera node.
    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let node_id = self.active_camera?;
        let camera = self.cameras.get_mut(node_id)?;
        let transform = &mut self.nodes.get_mut(node_id)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        self.cameras.get(self.active_camera?)
    }

    /// Visible lights together with their world matrices.
    pub fn iter_active_lights(&self) -> impl Iterator<Item = (NodeHandle, &Light, &Affine3A)> {
        self.lights.iter().filter_map(|(handle, light)| {
            let node = self.nodes.get(handle)?;
            node.visible.then_some((handle, light, &node.transform.world_matrix))
        })
    }

    // === Matrices ===

    /// Refreshes every world matrix. Call once per frame before rendering or
    /// picking.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &mut self.cameras, &self.root_nodes);
    }

    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, &mut self.cameras, root);
    }

    /// World-space bounds of every mesh in the subtree rooted at `root`.
    /// Uses the cached world matrices.
    #[must_use]
    pub fn world_bounds_of(&self, root: NodeHandle) -> Option<BoundingBox> {
        self.subtree(root)
            .into_iter()
            .filter_map(|handle| {
                let mesh = self.meshes.get(handle)?;
                let node = self.nodes.get(handle)?;
                Some(mesh.bounds.transform(&node.transform.world_matrix))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Nearest hit distance between `ray` and the meshes of the subtree
    /// rooted at `root`. Visibility is not considered.
    #[must_use]
    pub fn intersect_hierarchy(&self, root: NodeHandle, ray: &Ray) -> Option<f32> {
        self.subtree(root)
            .into_iter()
            .filter_map(|handle| {
                let mesh = self.meshes.get(handle)?;
                let node = self.nodes.get(handle)?;
                ray_hit_obb(ray, &node.transform.world_matrix, &mesh.bounds)
            })
            .min_by(f32::total_cmp)
    }
}
