//! Image loading.
//!
//! Decoding is memoized per source id by [`ImageCache`]. The cache is an owned
//! handle that callers pass to whatever needs images (tile maps, layers, the
//! editor palette) instead of a process-wide global.

mod cache;
mod error;
mod loader;

pub use cache::{ImageCache, ImageRequest, ImageStatus};
pub use error::ImageError;
pub use loader::{FsLoader, ImageLoader};

pub use image::RgbaImage;

#[cfg(test)]
pub(crate) use cache::tests::MemoryLoader;
