use std::fmt;

/// Failure to produce a decoded image for a source id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The source could not be found by the loader.
    NotFound { id: String },
    /// The source was found but could not be read or decoded.
    Decode { id: String, message: String },
}

impl ImageError {
    /// Source id the error refers to.
    pub fn id(&self) -> &str {
        match self {
            ImageError::NotFound { id } | ImageError::Decode { id, .. } => id,
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::NotFound { id } => write!(f, "image `{id}` not found"),
            ImageError::Decode { id, message } => {
                write!(f, "failed to decode image `{id}`: {message}")
            }
        }
    }
}

impl std::error::Error for ImageError {}
