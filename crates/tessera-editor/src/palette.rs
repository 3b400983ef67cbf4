use tessera_engine::tilemap::{TileError, TileGrid, TileIndex, TileLayer, TEXEL_BYTES};

/// Largest palette edge a tile index can address.
const MAX_CELLS: u32 = 256;

/// Grid showing the whole sprite sheet: cell `(x, y)` holds tile `(x, y)`.
///
/// Sheets wider or taller than 256 tiles are cut off. Cell (255, 255) is the
/// empty marker and stays blank.
pub fn palette_grid(columns: u32, rows: u32) -> Result<TileGrid, TileError> {
    let columns = columns.min(MAX_CELLS);
    let rows = rows.min(MAX_CELLS);

    let mut texels = Vec::with_capacity(columns as usize * rows as usize * TEXEL_BYTES);
    for y in 0..rows {
        for x in 0..columns {
            texels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
        }
    }
    TileGrid::from_rgba(columns, rows, texels)
}

/// Tile under palette cell `(x, y)`, if there is one.
pub fn pick(palette: &TileLayer, x: i64, y: i64) -> Option<TileIndex> {
    palette.read(x, y).filter(|tile| !tile.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_name_themselves() {
        let grid = palette_grid(3, 2).unwrap();
        assert_eq!(grid.read(0, 0), Some(TileIndex::new(0, 0)));
        assert_eq!(grid.read(2, 1), Some(TileIndex::new(2, 1)));
        assert!(!grid.is_dirty());
    }

    #[test]
    fn oversized_sheets_are_capped() {
        let grid = palette_grid(300, 1).unwrap();
        assert_eq!(grid.width(), 256);
        assert_eq!(grid.read(255, 0), Some(TileIndex::new(255, 0)));
    }

    #[test]
    fn the_empty_marker_cannot_be_picked() {
        let layer = TileLayer::from_grid(palette_grid(256, 256).unwrap());
        assert_eq!(pick(&layer, 255, 255), None);
        assert_eq!(pick(&layer, 255, 254), Some(TileIndex::new(255, 254)));
        assert_eq!(pick(&layer, 256, 0), None);
    }

    #[test]
    fn empty_sheet_gives_empty_palette() {
        let grid = palette_grid(0, 4).unwrap();
        assert!(grid.is_empty());
    }
}
