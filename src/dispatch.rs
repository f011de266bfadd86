//! Input dispatch
//!
//! Turns pointer clicks and key presses into key triggers.

use glam::Vec2;

use crate::input::Key;
use crate::keys::{KeyController, KeyId};
use crate::scene::{Camera, Scene};

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// The key that was triggered, if the press mapped to one and it reacted.
    pub triggered: Option<KeyId>,
    /// The host should suppress the platform's default action for this key
    /// (F1 opens help, Space scrolls).
    pub prevent_default: bool,
}

pub struct InputDispatcher;

impl InputDispatcher {
    /// Window coordinates to normalized device coordinates.
    #[must_use]
    pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            cursor.x / viewport.x * 2.0 - 1.0,
            -(cursor.y / viewport.y) * 2.0 + 1.0,
        ))
    }

    /// Maps a platform key to the interactive key it presses.
    #[must_use]
    pub fn map_key(key: Key) -> Option<(KeyId, bool)> {
        match key {
            Key::Enter | Key::NumpadEnter => Some((KeyId::Enter, false)),
            Key::F1 => Some((KeyId::F1, true)),
            Key::Space => Some((KeyId::Space, true)),
            Key::Other => None,
        }
    }

    /// `true` for keys whose platform default must be suppressed. Every
    /// other key keeps its default (reload, tab focus, shortcuts).
    #[must_use]
    pub fn prevents_default(key: Key) -> bool {
        Self::map_key(key).is_some_and(|(_, prevent)| prevent)
    }

    /// Casts a ray through `cursor` and triggers every key it hits. Keys are
    /// tested independently in priority order; overlapping keys all fire.
    pub fn on_click(
        scene: &mut Scene,
        camera: &Camera,
        cursor: Vec2,
        viewport: Vec2,
        keys: &mut [KeyController],
        now: f32,
    ) -> Vec<KeyId> {
        let Some(ndc) = Self::cursor_to_ndc(cursor, viewport) else {
            return Vec::new();
        };
        let Some(ray) = camera.ray_from_ndc(ndc) else {
            return Vec::new();
        };

        let mut triggered = Vec::new();
        for id in KeyId::PRIORITY {
            let Some(key) = keys.iter_mut().find(|k| k.id() == id) else {
                continue;
            };
            if key.hit_test(scene, &ray).is_some() && key.trigger(scene, now) {
                triggered.push(id);
            }
        }
        triggered
    }

    pub fn on_key(key: Key, scene: &mut Scene, keys: &mut [KeyController], now: f32) -> KeyResponse {
        let Some((id, prevent_default)) = Self::map_key(key) else {
            return KeyResponse::default();
        };

        let triggered = keys
            .iter_mut()
            .find(|k| k.id() == id)
            .is_some_and(|k| k.trigger(scene, now))
            .then_some(id);

        KeyResponse {
            triggered,
            prevent_default,
        }
    }
}
