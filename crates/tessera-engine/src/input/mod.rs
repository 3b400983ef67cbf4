//! Keyboard and pointer input.
//!
//! winit types stop at [`platform`]; the rest of the crate and the editor
//! only see [`InputEvent`], [`InputState`] and [`InputFrame`].

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
