pub mod fragment;
pub mod loaders;
pub mod server;

pub use fragment::{FragmentNode, SceneFragment};
pub use loaders::GltfLoader;
pub use server::{AssetEvent, AssetServer};
