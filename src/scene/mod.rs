//! Scene graph
//!
//! - Node: hierarchy entry with a TRS transform
//! - Scene: node storage plus mesh / light / camera components
//! - Camera: perspective projection and screen rays
//! - TransformSystem: world-matrix propagation
//! - raycast: ray vs. oriented mesh bounds

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
pub mod raycast;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{Light, LightKind, PointLight, ShadowConfig, SpotLight, color_from_hex};
pub use mesh::{BoundingBox, Mesh};
pub use node::Node;
pub use raycast::Ray;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
