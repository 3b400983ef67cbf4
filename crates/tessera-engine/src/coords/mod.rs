//! Small value types shared by the renderer and the editor.
//!
//! Screen space: origin top-left, +X right, +Y down.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
