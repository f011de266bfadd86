//! Platform-agnostic input
//!
//! Input types and the per-frame state container. Platform adapters (see
//! `app::winit::input_adapter`) translate native events into these types.

use glam::Vec2;
use std::collections::HashSet;

/// Keys the landing scene reacts to. Everything else arrives as `Other`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    NumpadEnter,
    F1,
    Space,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.code` value.
    #[must_use]
    pub fn from_dom_code(code: &str) -> Self {
        match code {
            "Enter" => Key::Enter,
            "NumpadEnter" => Key::NumpadEnter,
            "F1" => Key::F1,
            "Space" => Key::Space,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Input state container
#[derive(Debug, Clone)]
pub struct Input {
    pressed_keys: HashSet<Key>,
    just_pressed_keys: HashSet<Key>,

    pressed_mouse: HashSet<MouseButton>,
    just_pressed_mouse: HashSet<MouseButton>,
    just_released_mouse: HashSet<MouseButton>,

    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,

    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            just_pressed_keys: HashSet::new(),
            pressed_mouse: HashSet::new(),
            just_pressed_mouse: HashSet::new(),
            just_released_mouse: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
            screen_size: Vec2::ZERO,
        }
    }

    // ========== Adapter API ==========

    /// Clears the per-frame state (just pressed / released, deltas).
    pub fn start_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_pressed_mouse.clear();
        self.just_released_mouse.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Returns `true` when this is a fresh press (not an auto-repeat).
    pub fn inject_key(&mut self, key: Key, state: ButtonState) -> bool {
        match state {
            ButtonState::Pressed => {
                let fresh = self.pressed_keys.insert(key);
                if fresh {
                    self.just_pressed_keys.insert(key);
                }
                fresh
            }
            ButtonState::Released => {
                self.pressed_keys.remove(&key);
                false
            }
        }
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_mouse.insert(button) {
                    self.just_pressed_mouse.insert(button);
                }
            }
            ButtonState::Released => {
                if self.pressed_mouse.remove(&button) {
                    self.just_released_mouse.insert(button);
                }
            }
        }
    }

    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        if self.mouse_position != Vec2::ZERO {
            self.mouse_delta += new_pos - self.mouse_position;
        }
        self.mouse_position = new_pos;
    }

    pub fn inject_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta += Vec2::new(delta_x, delta_y);
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========== Queries ==========

    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_down(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_up(&self, button: MouseButton) -> bool {
        self.just_released_mouse.contains(&button)
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}
