use crate::coords::{Rect, Vec2, Viewport};

/// Default sprite cell size in sheet pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Viewport, scale and tile size of a tile map.
///
/// `scaled_viewport` is always `viewport / scale`: both setters recompute it,
/// so the order in which they are called does not matter.
///
/// Units: `viewport` and `origin` are surface pixels; `scaled_viewport` and
/// layer offsets are sprite-sheet pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapView {
    tile_size: u32,
    scale: f32,
    viewport: Viewport,
    scaled_viewport: Viewport,
    origin: Vec2,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            scale: 1.0,
            viewport: Viewport::default(),
            scaled_viewport: Viewport::default(),
            origin: Vec2::zero(),
        }
    }
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn scaled_viewport(&self) -> Viewport {
        self.scaled_viewport
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.rescale();
    }

    /// Sets the render scale.
    ///
    /// # Panics
    /// If `factor` is not a positive finite number.
    pub fn set_scale(&mut self, factor: f32) {
        assert!(
            factor.is_finite() && factor > 0.0,
            "tile map scale must be positive and finite, got {factor}"
        );
        self.scale = factor;
        self.rescale();
    }

    /// Sets the sprite cell size.
    ///
    /// # Panics
    /// If `pixels` is zero.
    pub fn set_tile_size(&mut self, pixels: u32) {
        assert!(pixels > 0, "tile size must be non-zero");
        self.tile_size = pixels;
    }

    /// Top-left corner of the map's region on the surface.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = Vec2::new(x, y);
    }

    /// Scrolled camera offset of a layer, in sheet pixels.
    pub fn layer_offset(&self, camera: Vec2, scroll: Vec2) -> Vec2 {
        (camera * self.scale).scale(scroll).floor()
    }

    /// Grid cell under the region-local pixel `(px, py)`.
    ///
    /// Same mapping as the vertex shader: `pixel / scale + offset`, divided
    /// by the tile size.
    pub fn pick_cell(&self, px: f32, py: f32, camera: Vec2, scroll: Vec2) -> (i64, i64) {
        let offset = self.layer_offset(camera, scroll);
        let tile = self.tile_size as f32;
        (
            ((px / self.scale + offset.x) / tile).floor() as i64,
            ((py / self.scale + offset.y) / tile).floor() as i64,
        )
    }

    /// Region-local rectangle covered by cell `(cx, cy)`. Inverse of
    /// [`MapView::pick_cell`].
    pub fn cell_rect(&self, cx: i64, cy: i64, camera: Vec2, scroll: Vec2) -> Rect {
        let offset = self.layer_offset(camera, scroll);
        let tile = self.tile_size as f32;
        let side = tile * self.scale;
        Rect::new(
            (cx as f32 * tile - offset.x) * self.scale,
            (cy as f32 * tile - offset.y) * self.scale,
            side,
            side,
        )
    }

    /// `true` if the surface pixel `(x, y)` lies inside this map's region.
    pub fn region_contains(&self, x: f32, y: f32) -> bool {
        self.viewport.contains(x - self.origin.x, y - self.origin.y)
    }

    fn rescale(&mut self) {
        self.scaled_viewport = self.viewport.shrink(self.scale);
    }
}
