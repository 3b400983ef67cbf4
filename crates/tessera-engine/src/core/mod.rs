//! Contract between the window runtime and the application.
//!
//! The runtime owns the event loop, the window and the GPU; the application
//! implements [`App`] and receives a [`FrameCtx`] once per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
