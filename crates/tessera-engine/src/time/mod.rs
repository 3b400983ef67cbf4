//! Frame timing.
//!
//! The runtime owns one [`FrameClock`] and ticks it once per redraw; the
//! resulting [`FrameTime`] is handed to the application in the frame context.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
