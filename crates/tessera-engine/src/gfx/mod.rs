//! GPU program and resource provisioning.
//!
//! Shader programs are compiled from WGSL through [`ShaderProgram`], which
//! validates the source and resolves named bindings up front. The helpers in
//! [`resources`] cover the buffers, textures and samplers the tile renderer
//! needs.

mod error;
#[cfg(test)]
pub(crate) mod headless;
mod program;
pub mod resources;

pub use error::GfxError;
pub use program::{reflect, BindingSlot, ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
