//! Tessera engine crate.
//!
//! GPU tile-map rendering on top of wgpu, plus the window runtime, input and
//! image loading an interactive tile editor needs.

pub mod assets;
pub mod coords;
pub mod core;
pub mod device;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod render;
pub mod tilemap;
pub mod time;
pub mod window;
