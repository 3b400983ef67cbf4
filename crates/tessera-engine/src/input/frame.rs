use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// What happened since the previous frame.
///
/// [`super::InputState`] answers "is it held"; this answers "did it just
/// change". Cleared by the runtime after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// `key` went down this frame (repeats excluded).
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Every press of `button` this frame with its position, oldest first.
    ///
    /// Two clicks between frames are both reported, unlike
    /// [`InputFrame::buttons_pressed`].
    pub fn clicks(&self, button: MouseButton) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.events.iter().filter_map(move |ev| match *ev {
            InputEvent::PointerButton { button: b, state: ButtonState::Pressed, x, y } if b == button => {
                Some((x, y))
            }
            _ => None,
        })
    }
}
