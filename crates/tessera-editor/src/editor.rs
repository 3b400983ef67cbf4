use tessera_engine::assets::ImageCache;
use tessera_engine::coords::{ColorRgba, Rect, Vec2};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::{InputState, Key, MouseButton};
use tessera_engine::render::OutlineRenderer;
use tessera_engine::tilemap::{TileGrid, TileIndex, TileLayer, TileMap, TileMapConfig};

use crate::layout::{self, Split};
use crate::paint::{Brush, Stroke};
use crate::palette;

/// Layer the editor paints into.
const PAINT_LAYER: u32 = 0;

/// Camera units per second while a pan key is held.
const PAN_SPEED: f32 = 240.0;

const BACKGROUND: ColorRgba = ColorRgba::new(0.0, 0.0, 0.1, 1.0);

/// Border around the selected palette tile, logical pixels.
const SELECTION_WIDTH: f32 = 2.0;
const SELECTION_COLOR: ColorRgba = ColorRgba::new(1.0, 0.85, 0.0, 1.0);

/// Where the painted layer comes from.
#[derive(Debug, Clone)]
pub enum MapSource {
    Image(String),
    Blank { width: u32, height: u32 },
}

#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub sheet: String,
    pub map: MapSource,
    pub config: TileMapConfig,
}

/// Sprite sheet palette on the left, editable map on the right.
pub struct EditorApp {
    images: ImageCache,
    scale: f32,
    palette: TileMap,
    map: TileMap,
    brush: Brush,
    selector: OutlineRenderer,
    camera: Vec2,
    palette_ready: bool,
}

impl EditorApp {
    pub fn new(images: ImageCache, settings: &EditorSettings) -> Self {
        let config = settings.config;

        // The palette shows the sheet 1:1 in tile coordinates; it never wraps.
        let mut palette =
            TileMap::with_config(images.clone(), TileMapConfig { repeat: false, ..config });
        palette.set_sprite_sheet(&settings.sheet);

        let mut map = TileMap::with_config(images.clone(), config);
        map.set_sprite_sheet(&settings.sheet);
        match &settings.map {
            MapSource::Image(source) => {
                map.add_layer(source, PAINT_LAYER, None, None);
            }
            MapSource::Blank { width, height } => {
                let layer = TileLayer::from_grid(TileGrid::new(*width, *height))
                    .with_repeat(config.repeat);
                map.insert_layer(PAINT_LAYER, layer);
            }
        }

        Self {
            images,
            scale: config.scale,
            palette,
            map,
            brush: Brush::default(),
            selector: OutlineRenderer::new(),
            camera: Vec2::zero(),
            palette_ready: false,
        }
    }

    /// Fills the palette once the sheet's dimensions are known and selects
    /// the top-left tile.
    fn build_palette(&mut self) {
        if self.palette_ready {
            return;
        }
        let Some((columns, rows)) = self.palette.sprite_sheet_tiles() else {
            return;
        };
        self.palette_ready = true;

        match palette::palette_grid(columns, rows) {
            Ok(grid) => {
                self.palette.insert_layer(0, TileLayer::from_grid(grid));
                log::info!("palette ready ({columns}x{rows} tiles)");
            }
            Err(e) => log::error!("could not build palette: {e}"),
        }
        self.brush.select(TileIndex::new(0, 0));
    }

    fn apply_layout(&mut self, split: Split, dpi: f32) {
        let scale = self.scale * dpi;

        self.palette.set_scale(scale);
        self.palette.set_origin(0.0, 0.0);
        self.palette.set_viewport(split.palette_view.0, split.palette_view.1);

        self.map.set_scale(scale);
        self.map.set_origin(split.map_x, 0.0);
        self.map.set_viewport(split.map_width, split.height);
    }

    /// Palette cell of the selected tile, in physical pixels.
    fn selection_rect(&self) -> Option<Rect> {
        let tile = self.brush.selected()?;
        self.palette.cell_rect(0, tile.u as i64, tile.v as i64, Vec2::zero())
    }

    /// Routes a click in physical pixels to the palette or the map.
    fn click(&mut self, x: f32, y: f32) {
        if let Some((cx, cy)) = self.palette.pick_cell(0, x, y, Vec2::zero()) {
            if let Some(tile) = self.palette.layer(0).and_then(|l| palette::pick(l, cx, cy)) {
                self.brush.select(tile);
            }
            return;
        }

        let Some((cx, cy)) = self.map.pick_cell(PAINT_LAYER, x, y, self.camera) else {
            return;
        };
        let Some(layer) = self.map.layer_mut(PAINT_LAYER) else {
            return;
        };
        if let Some(Stroke::Painted(tile)) = self.brush.stroke(layer, cx, cy) {
            log::trace!("painted ({}, {}) at ({cx}, {cy})", tile.u, tile.v);
        }
    }

    fn pan(&mut self, input: &InputState, dt: f32) {
        let axis = |neg: &[Key], pos: &[Key]| {
            input.any_down(pos) as i32 as f32 - input.any_down(neg) as i32 as f32
        };
        let dir = Vec2::new(
            axis(&[Key::ArrowLeft, Key::A], &[Key::ArrowRight, Key::D]),
            axis(&[Key::ArrowUp, Key::W], &[Key::ArrowDown, Key::S]),
        );
        self.camera += dir * (PAN_SPEED * dt);
    }
}

impl App for EditorApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.images.pump();

        let updated = {
            let rctx = ctx.render_ctx();
            self.palette.update(&rctx).and_then(|_| self.map.update(&rctx))
        };
        if let Err(e) = updated {
            ctx.runtime.fail(anyhow::Error::new(e).context("tile map renderer"));
            return AppControl::Exit;
        }
        self.build_palette();

        let dpi = ctx.window.scale_factor();
        let sheet = self.palette.sprite_sheet_size();
        let split = layout::split(ctx.window.physical_size(), sheet, self.scale, dpi);
        self.apply_layout(split, dpi);

        for (x, y) in ctx.input_frame.clicks(MouseButton::Left) {
            self.click(x * dpi, y * dpi);
        }

        if ctx.input_frame.key_pressed(Key::Home) {
            self.camera = Vec2::zero();
        }
        self.pan(ctx.input, ctx.time.dt);

        let camera = self.camera;
        let selection = self.selection_rect();
        let (palette, map, selector) = (&mut self.palette, &mut self.map, &mut self.selector);
        let mut outlined = Ok(());
        let control = ctx.render(BACKGROUND, |rctx, target| {
            palette.draw(rctx, target, Vec2::zero());
            map.draw(rctx, target, camera);
            if let Some(rect) = selection {
                outlined = selector.draw(rctx, target, rect, SELECTION_WIDTH * dpi, SELECTION_COLOR);
            }
        });
        if let Err(e) = outlined {
            ctx.runtime.fail(anyhow::Error::new(e).context("selection outline"));
            return AppControl::Exit;
        }
        control
    }
}
