use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Held keys and buttons, pointer position and focus.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Last pointer position in logical pixels; `None` outside the window.
    pub pointer: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and records the change in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases delivered while unfocused are lost.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
            InputEvent::PointerMoved { x, y } => self.pointer = Some((x, y)),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::Key { key, state, .. } => {
                if track(&mut self.keys_down, key, state) {
                    match state {
                        ButtonState::Pressed => frame.keys_pressed.insert(key),
                        ButtonState::Released => frame.keys_released.insert(key),
                    };
                }
            }
            InputEvent::PointerButton { button, state, x, y } => {
                self.pointer = Some((x, y));
                if track(&mut self.buttons_down, button, state) {
                    match state {
                        ButtonState::Pressed => frame.buttons_pressed.insert(button),
                        ButtonState::Released => frame.buttons_released.insert(button),
                    };
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` if any of `keys` is held.
    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

/// Updates a held set; `true` if the state actually changed.
fn track<T: Eq + std::hash::Hash>(held: &mut HashSet<T>, item: T, state: ButtonState) -> bool {
    match state {
        ButtonState::Pressed => held.insert(item),
        ButtonState::Released => held.remove(&item),
    }
}
