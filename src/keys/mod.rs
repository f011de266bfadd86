//! Interactive keys
//!
//! One [`KeyController`] per clickable key of the keyboard model. Each owns
//! its mixer, press action, glow light and fly-away latch.

pub mod controller;
pub mod spec;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use controller::{FlyState, KeyController, Playback, RetriggerPolicy};
pub use spec::{KeySpec, PointLightSpec, SpotLightSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyId {
    Enter,
    F1,
    Space,
}

impl KeyId {
    /// Order used both for click hit-tests and for picking the key that
    /// drives the camera.
    pub const PRIORITY: [KeyId; 3] = [KeyId::Enter, KeyId::F1, KeyId::Space];

    /// Position in [`KeyId::PRIORITY`], lower wins.
    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            KeyId::Enter => 0,
            KeyId::F1 => 1,
            KeyId::Space => 2,
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyId::Enter => "Enter",
            KeyId::F1 => "F1",
            KeyId::Space => "Space",
        };
        f.write_str(name)
    }
}
