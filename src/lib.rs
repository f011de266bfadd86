#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod frame;
pub mod input;
pub mod keys;
pub mod landing;
pub mod navigation;
pub mod render;
pub mod scene;
pub mod utils;

#[cfg(feature = "winit")]
pub use app::App;
pub use animation::{AnimationAction, AnimationClip, AnimationMixer, LoopMode};
pub use assets::{AssetEvent, AssetServer, GltfLoader, SceneFragment};
pub use config::LandingConfig;
pub use dispatch::{InputDispatcher, KeyResponse};
pub use errors::{KeyportalError, Result};
pub use frame::{FlyAwayParams, FrameScheduler, FrameState, TickReport};
pub use input::{ButtonState, Input, Key, MouseButton};
pub use keys::{FlyState, KeyController, KeyId, KeySpec, Playback, RetriggerPolicy};
pub use landing::{AssetTag, Landing};
pub use navigation::{LogNavigator, Navigator, RecordingNavigator};
pub use render::{HeadlessRenderer, RenderSettings, Renderer};
pub use scene::{Camera, Light, Node, NodeHandle, Scene};
pub use utils::{OrbitControls, Timer};

/// Browser entry point: binds the `keyportal-canvas` element.
#[cfg(all(target_arch = "wasm32", feature = "winit"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {err}").into());
    }

    if let Err(err) = App::new(LandingConfig::default()).run() {
        log::error!("keyportal failed to start: {err}");
    }
}
