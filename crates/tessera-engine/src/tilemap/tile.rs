/// Position of a tile inside the sprite sheet, in tile cells (not pixels).
///
/// `(255, 255)` is reserved as the "no tile" marker ([`TileIndex::EMPTY`]).
/// It never addresses a sprite; cells holding it are discarded by the shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TileIndex {
    pub u: u8,
    pub v: u8,
}

impl TileIndex {
    /// Empty / transparent cell.
    pub const EMPTY: TileIndex = TileIndex { u: 255, v: 255 };

    #[inline]
    pub const fn new(u: u8, v: u8) -> Self {
        Self { u, v }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.u == Self::EMPTY.u && self.v == Self::EMPTY.v
    }

    /// Decodes a tile index from an RGBA texel (red = u, green = v).
    #[inline]
    pub const fn from_texel(texel: [u8; 4]) -> Self {
        Self { u: texel[0], v: texel[1] }
    }

    /// Top-left pixel of this tile in a sprite sheet with `tile_size` pixel cells.
    ///
    /// Returns `None` for the empty marker.
    pub fn sprite_origin(self, tile_size: u32) -> Option<(u32, u32)> {
        if self.is_empty() {
            return None;
        }
        Some((self.u as u32 * tile_size, self.v as u32 * tile_size))
    }
}

impl Default for TileIndex {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<(u8, u8)> for TileIndex {
    fn from((u, v): (u8, u8)) -> Self {
        Self::new(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(TileIndex::default().is_empty());
        assert_eq!(TileIndex::default(), TileIndex::new(255, 255));
    }

    #[test]
    fn only_the_full_pair_is_empty() {
        assert!(!TileIndex::new(255, 0).is_empty());
        assert!(!TileIndex::new(0, 255).is_empty());
        assert!(!TileIndex::new(254, 254).is_empty());
    }

    #[test]
    fn texel_decoding_ignores_blue_and_alpha() {
        assert_eq!(TileIndex::from_texel([3, 7, 200, 13]), TileIndex::new(3, 7));
    }

    #[test]
    fn sprite_origin_scales_by_tile_size() {
        assert_eq!(TileIndex::new(1, 0).sprite_origin(16), Some((16, 0)));
        assert_eq!(TileIndex::new(2, 3).sprite_origin(8), Some((16, 24)));
        assert_eq!(TileIndex::EMPTY.sprite_origin(16), None);
    }
}
