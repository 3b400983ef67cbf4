use super::error::TileError;
use super::tile::TileIndex;

/// Bytes per grid cell. Cells are stored as RGBA8 texels so the grid can be
/// uploaded to the GPU without repacking.
pub const TEXEL_BYTES: usize = 4;

/// Destination for a full grid upload.
///
/// Implemented by the layer's GPU mirror; tests use recording sinks.
pub trait TexelSink {
    fn upload(&mut self, width: u32, height: u32, texels: &[u8]);
}

/// CPU-side tile buffer of one layer.
///
/// Layout is row-major, one RGBA8 texel per cell: red = u, green = v.
/// Blue and alpha are carried through untouched so texels decoded from a map
/// image keep their full value.
///
/// The dirty flag tracks whether the buffer is ahead of its GPU mirror.
/// Writes only set the flag; [`TileGrid::flush`] performs the upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    texels: Vec<u8>,
    dirty: bool,
}

impl TileGrid {
    /// Grid of `width × height` empty cells.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TileIndex::EMPTY)
    }

    /// Grid with every cell set to `index`.
    pub fn filled(width: u32, height: u32, index: TileIndex) -> Self {
        let cells = width as usize * height as usize;
        let mut texels = Vec::with_capacity(cells * TEXEL_BYTES);
        for _ in 0..cells {
            texels.extend_from_slice(&[index.u, index.v, 0, 255]);
        }
        Self { width, height, texels, dirty: false }
    }

    /// Adopts decoded RGBA8 pixels 1:1 as grid texels.
    ///
    /// The returned grid is clean: callers upload it as the initial mirror.
    pub fn from_rgba(width: u32, height: u32, texels: Vec<u8>) -> Result<Self, TileError> {
        let expected = width as usize * height as usize * TEXEL_BYTES;
        if texels.len() != expected {
            return Err(TileError::TexelLength { expected, actual: texels.len() });
        }
        Ok(Self { width, height, texels, dirty: false })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 texels, row-major.
    #[inline]
    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `true` iff `0 <= x < width` and `0 <= y < height`.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    pub fn read(&self, x: i64, y: i64) -> Option<TileIndex> {
        let i = self.offset(x, y)?;
        Some(TileIndex::new(self.texels[i], self.texels[i + 1]))
    }

    /// Sets the cell at `(x, y)` and marks the grid dirty.
    ///
    /// Out-of-range coordinates are rejected and leave the grid unchanged.
    pub fn write(&mut self, x: i64, y: i64, index: TileIndex) -> Result<(), TileError> {
        let Some(i) = self.offset(x, y) else {
            return Err(TileError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        };
        self.texels[i] = index.u;
        self.texels[i + 1] = index.v;
        self.dirty = true;
        Ok(())
    }

    /// Sets every cell to `index`.
    pub fn fill(&mut self, index: TileIndex) {
        for texel in self.texels.chunks_exact_mut(TEXEL_BYTES) {
            texel[0] = index.u;
            texel[1] = index.v;
        }
        self.dirty = true;
    }

    /// Row-major snapshot of every cell.
    pub fn dump(&self) -> Vec<Vec<TileIndex>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.texels
            .chunks_exact(self.width as usize * TEXEL_BYTES)
            .map(|row| {
                row.chunks_exact(TEXEL_BYTES)
                    .map(|t| TileIndex::new(t[0], t[1]))
                    .collect()
            })
            .collect()
    }

    /// Uploads the whole grid to `sink` if it is dirty, then clears the flag.
    ///
    /// Returns whether an upload happened.
    pub fn flush<S: TexelSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if !self.dirty {
            return false;
        }
        sink.upload(self.width, self.height, &self.texels);
        self.dirty = false;
        true
    }

    /// Clears the dirty flag after an out-of-band upload (mirror creation).
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * TEXEL_BYTES)
    }
}
