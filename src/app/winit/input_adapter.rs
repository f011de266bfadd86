//! Winit input adapter
//!
//! Translates winit events into the crate's platform-agnostic input types.

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{ButtonState, Input, Key, MouseButton};

#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical_key else {
        return Key::Other;
    };
    match code {
        KeyCode::Enter => Key::Enter,
        KeyCode::NumpadEnter => Key::NumpadEnter,
        KeyCode::F1 => Key::F1,
        KeyCode::Space => Key::Space,
        _ => Key::Other,
    }
}

#[must_use]
pub fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// What the host still has to act on after the event reached [`Input`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// A key went down. Auto-repeats count as presses too.
    KeyPressed(Key),
    /// The primary button was released at this cursor position.
    Click { x: f32, y: f32 },
}

/// Records a key transition. Every press is reported, held or not: each
/// key-down triggers its key again.
pub fn key_action(input: &mut Input, key: Key, state: ButtonState) -> Option<InputAction> {
    input.inject_key(key, state);
    (state == ButtonState::Pressed).then_some(InputAction::KeyPressed(key))
}

/// Feeds `event` into `input`.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) -> Option<InputAction> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            key_action(input, translate_key(event.physical_key), translate_element_state(event.state))
        }

        WindowEvent::CursorMoved { position, .. } => {
            input.inject_mouse_position(position.x as f32, position.y as f32);
            None
        }

        WindowEvent::MouseInput { state, button, .. } => {
            let button = translate_mouse_button(*button);
            let state = translate_element_state(*state);
            input.inject_mouse_button(button, state);
            if button == MouseButton::Left && state == ButtonState::Released {
                let cursor = input.mouse_position();
                return Some(InputAction::Click {
                    x: cursor.x,
                    y: cursor.y,
                });
            }
            None
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => {
                    const PIXEL_SCALE: f32 = 0.01;
                    (pos.x as f32 * PIXEL_SCALE, pos.y as f32 * PIXEL_SCALE)
                }
            };
            input.inject_scroll(dx, dy);
            None
        }

        _ => None,
    }
}
