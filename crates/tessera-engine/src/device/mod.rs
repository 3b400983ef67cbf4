//! Window surface and GPU device.
//!
//! [`Gpu`] owns the device, the queue and the configured surface of the one
//! editor window. It survives resizes and hands out one [`GpuFrame`] per
//! redraw.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
