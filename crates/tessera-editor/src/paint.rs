use tessera_engine::tilemap::{TileIndex, TileLayer};

/// Result of clicking a map cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stroke {
    Painted(TileIndex),
    Erased,
}

/// The active tile and how clicks apply it.
#[derive(Debug, Default, Copy, Clone)]
pub struct Brush {
    selected: Option<TileIndex>,
}

impl Brush {
    pub fn selected(&self) -> Option<TileIndex> {
        self.selected
    }

    pub fn select(&mut self, tile: TileIndex) {
        if self.selected != Some(tile) {
            log::info!("selected tile ({}, {})", tile.u, tile.v);
        }
        self.selected = Some(tile);
    }

    /// Paints the selected tile at `(x, y)`, or erases the cell if it already
    /// holds that tile.
    ///
    /// Does nothing without a selection or outside the layer.
    pub fn stroke(&self, layer: &mut TileLayer, x: i64, y: i64) -> Option<Stroke> {
        let tile = self.selected?;
        let current = layer.read(x, y)?;

        let (next, stroke) = if current == tile {
            (TileIndex::EMPTY, Stroke::Erased)
        } else {
            (tile, Stroke::Painted(tile))
        };
        layer.write(x, y, next).ok()?;

        log::debug!("{stroke:?} at ({x}, {y})");
        Some(stroke)
    }
}
