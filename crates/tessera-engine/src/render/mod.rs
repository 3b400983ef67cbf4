//! Handles passed to renderers for one frame, plus the overlay renderers
//! that draw on top of tile maps.
//!
//! Renderers own their GPU resources and record passes into the frame's
//! encoder. They load the target rather than clear it; the frame clear happens
//! once in [`crate::core::FrameCtx::render`].

mod ctx;
mod outline;

pub use ctx::{RenderCtx, RenderTarget};
pub use outline::OutlineRenderer;
