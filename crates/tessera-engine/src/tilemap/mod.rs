//! Tile maps.
//!
//! A [`TileMap`] owns a sprite sheet and a set of [`TileLayer`]s. Each layer
//! is a grid of [`TileIndex`] cells stored as RGBA8 texels (red = sprite
//! column, green = sprite row) and mirrored into a GPU texture. At draw time
//! every layer is composited with one full-viewport quad whose fragment
//! shader resolves cells to sprites.

mod error;
mod grid;
mod layer;
mod map;
mod pipeline;
mod tile;
mod view;

pub use error::TileError;
pub use grid::{TexelSink, TileGrid, TEXEL_BYTES};
pub use layer::TileLayer;
pub use map::{LayerDraw, SpriteFilter, TileMap, TileMapConfig};
pub use tile::TileIndex;
pub use view::{MapView, DEFAULT_TILE_SIZE};
