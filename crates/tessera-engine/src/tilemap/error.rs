use std::fmt;

/// Errors from tile grid access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// A cell coordinate outside `0..width` × `0..height`.
    OutOfBounds { x: i64, y: i64, width: u32, height: u32 },
    /// Texel data whose length does not match `width * height * 4`.
    TexelLength { expected: usize, actual: usize },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::OutOfBounds { x, y, width, height } => {
                write!(f, "tile ({x}, {y}) is outside the {width}x{height} grid")
            }
            TileError::TexelLength { expected, actual } => {
                write!(f, "expected {expected} bytes of RGBA texels, got {actual}")
            }
        }
    }
}

impl std::error::Error for TileError {}
