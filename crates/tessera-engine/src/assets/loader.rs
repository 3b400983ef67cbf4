use std::io::ErrorKind;
use std::path::PathBuf;

use image::RgbaImage;

use super::error::ImageError;

/// Decodes a source id into RGBA8 pixels.
///
/// Called by [`super::ImageCache::pump`] on the render-loop thread, at most
/// once per distinct source id.
pub trait ImageLoader {
    fn load(&self, id: &str) -> Result<RgbaImage, ImageError>;
}

/// Loads images from files below an asset root.
///
/// Source ids are paths relative to `root`. The format is guessed from the
/// file extension.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageLoader for FsLoader {
    fn load(&self, id: &str) -> Result<RgbaImage, ImageError> {
        let path = self.root.join(id);
        let decoded = image::open(&path).map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => {
                ImageError::NotFound { id: id.to_string() }
            }
            other => ImageError::Decode {
                id: id.to_string(),
                message: other.to_string(),
            },
        })?;

        log::debug!(
            "decoded `{}` ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Ok(decoded.to_rgba8())
    }
}
