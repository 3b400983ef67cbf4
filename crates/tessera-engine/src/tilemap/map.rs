use std::collections::BTreeMap;
use std::rc::Rc;

use crate::assets::{ImageCache, ImageRequest, ImageStatus, RgbaImage};
use crate::coords::{Rect, Vec2, Viewport};
use crate::gfx::{resources, GfxError};
use crate::render::{RenderCtx, RenderTarget};

use super::layer::TileLayer;
use super::pipeline::{MapUniform, TileMapPipeline};
use super::view::{MapView, DEFAULT_TILE_SIZE};

/// Sampling filter for the sprite sheet.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SpriteFilter {
    #[default]
    Nearest,
    Linear,
}

impl SpriteFilter {
    fn mode(self) -> wgpu::FilterMode {
        match self {
            SpriteFilter::Nearest => wgpu::FilterMode::Nearest,
            SpriteFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Initial map settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileMapConfig {
    /// Sprite cell size in sheet pixels.
    pub tile_size: u32,
    /// Surface pixels per sheet pixel.
    pub scale: f32,
    pub filter: SpriteFilter,
    /// Wrap mode of layers added with [`TileMap::add_layer`].
    pub repeat: bool,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            scale: 1.0,
            filter: SpriteFilter::Nearest,
            repeat: false,
        }
    }
}

/// One layer in a frame's draw sequence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerDraw {
    pub id: u32,
    /// Scrolled camera offset in sheet pixels.
    pub offset: Vec2,
}

#[derive(Default)]
struct SpriteSheet {
    request: Option<ImageRequest>,
    image: Option<Rc<RgbaImage>>,
    view: Option<wgpu::TextureView>,
}

impl SpriteSheet {
    fn size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }
}

/// A stack of tile layers sharing one sprite sheet.
///
/// Layers are keyed by id. Higher ids are drawn first, so layer 0 ends up on
/// top. Every layer is a full-viewport quad: the shader looks up the cell
/// under each fragment in the layer's tile texture and samples the matching
/// sprite.
///
/// Frame protocol:
/// - [`TileMap::update`] after [`ImageCache::pump`]: applies finished loads
///   and builds GPU resources.
/// - [`TileMap::draw`]: uploads dirty layers, then composites.
///
/// Nothing is drawn until the sprite sheet has loaded.
pub struct TileMap {
    images: ImageCache,
    view: MapView,
    filter: SpriteFilter,
    repeat: bool,
    sheet: SpriteSheet,
    layers: BTreeMap<u32, TileLayer>,

    pipeline: Option<TileMapPipeline>,
    map_bind_group: Option<wgpu::BindGroup>,
}

impl TileMap {
    pub fn new(images: ImageCache) -> Self {
        Self::with_config(images, TileMapConfig::default())
    }

    pub fn with_config(images: ImageCache, config: TileMapConfig) -> Self {
        let mut view = MapView::new();
        view.set_tile_size(config.tile_size);
        view.set_scale(config.scale);

        Self {
            images,
            view,
            filter: config.filter,
            repeat: config.repeat,
            sheet: SpriteSheet::default(),
            layers: BTreeMap::new(),
            pipeline: None,
            map_bind_group: None,
        }
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    // ── sprite sheet ──────────────────────────────────────────────────────

    /// Starts loading the shared sprite sheet.
    pub fn set_sprite_sheet(&mut self, source: &str) {
        self.sheet = SpriteSheet {
            request: Some(self.images.request(source)),
            ..SpriteSheet::default()
        };
        self.map_bind_group = None;
        self.poll_sheet();
    }

    /// Pixel size of the sprite sheet once it has loaded.
    pub fn sprite_sheet_size(&self) -> Option<(u32, u32)> {
        self.sheet.size()
    }

    /// Sheet size in whole tiles.
    pub fn sprite_sheet_tiles(&self) -> Option<(u32, u32)> {
        let tile = self.view.tile_size();
        self.sheet.size().map(|(w, h)| (w / tile, h / tile))
    }

    pub fn is_sheet_ready(&self) -> bool {
        self.sheet.image.is_some()
    }

    pub fn filter(&self) -> SpriteFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: SpriteFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.map_bind_group = None;
        }
    }

    // ── view ──────────────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.view.set_viewport(width, height);
    }

    /// # Panics
    /// If `factor` is not a positive finite number.
    pub fn set_scale(&mut self, factor: f32) {
        self.view.set_scale(factor);
    }

    /// # Panics
    /// If `pixels` is zero.
    pub fn set_tile_size(&mut self, pixels: u32) {
        self.view.set_tile_size(pixels);
    }

    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.view.set_origin(x, y);
    }

    // ── layers ────────────────────────────────────────────────────────────

    /// Creates a layer loading from `source` and installs it at `id`.
    ///
    /// Any layer already at `id` is replaced. Scroll factors default to 1;
    /// only the ones given are applied.
    pub fn add_layer(
        &mut self,
        source: &str,
        id: u32,
        scroll_x: Option<f32>,
        scroll_y: Option<f32>,
    ) -> &mut TileLayer {
        let mut layer = TileLayer::new();
        if let Some(x) = scroll_x {
            layer.set_scroll_x(x);
        }
        if let Some(y) = scroll_y {
            layer.set_scroll_y(y);
        }
        layer.set_source(&self.images, source, self.repeat);
        self.insert_layer(id, layer)
    }

    /// Installs a prepared layer at `id`, replacing any previous one.
    pub fn insert_layer(&mut self, id: u32, layer: TileLayer) -> &mut TileLayer {
        if self.layers.insert(id, layer).is_some() {
            log::info!("replaced tile layer {id}");
        }
        // Just inserted.
        self.layers.entry(id).or_default()
    }

    pub fn layer(&self, id: u32) -> Option<&TileLayer> {
        self.layers.get(&id)
    }

    pub fn layer_mut(&mut self, id: u32) -> Option<&mut TileLayer> {
        self.layers.get_mut(&id)
    }

    /// Layer ids in ascending order.
    pub fn layer_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers.keys().copied()
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Applies settled image loads to the sheet and layers.
    ///
    /// Returns `true` if anything became ready.
    pub fn poll(&mut self) -> bool {
        let mut changed = self.poll_sheet();
        for layer in self.layers.values_mut() {
            changed |= layer.poll_source();
        }
        changed
    }

    /// Applies settled loads and creates any missing GPU resources.
    ///
    /// Fails only if the pipeline cannot be built.
    pub fn update(&mut self, ctx: &RenderCtx<'_>) -> Result<(), GfxError> {
        self.ensure_pipeline(ctx)?;
        self.poll();
        self.ensure_sheet_texture(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else {
            return Ok(());
        };
        for layer in self.layers.values_mut() {
            layer.ensure_gpu(ctx.device, ctx.queue, &pipeline.layer_layout);
        }
        self.ensure_map_bind_group(ctx);
        Ok(())
    }

    /// Populated layers in draw order (descending id) with their offsets.
    pub fn draw_order(&self, camera: Vec2) -> Vec<LayerDraw> {
        self.layers
            .iter()
            .rev()
            .filter(|(_, layer)| layer.is_populated())
            .map(|(&id, layer)| LayerDraw {
                id,
                offset: self.view.layer_offset(camera, layer.scroll()),
            })
            .collect()
    }

    /// Composites every populated layer into `target` inside the map region.
    ///
    /// The target is loaded, not cleared. Dirty layers are re-uploaded first.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, camera: Vec2) {
        let Some(region) = visible_region(&self.view, ctx.viewport) else {
            return;
        };
        let (Some(pipeline), Some(map_bind_group), Some(sheet_size)) = (
            self.pipeline.as_ref(),
            self.map_bind_group.as_ref(),
            self.sheet.size(),
        ) else {
            return;
        };

        let scale = self.view.scale();
        let uniform = MapUniform::new(
            [region.width / scale, region.height / scale],
            sheet_size,
            self.view.tile_size(),
        );
        ctx.queue.write_buffer(&pipeline.map_ubo, 0, bytemuck::bytes_of(&uniform));

        let order = self.draw_order(camera);
        for draw in &order {
            let Some(layer) = self.layers.get_mut(&draw.id) else { continue };
            layer.ensure_gpu(ctx.device, ctx.queue, &pipeline.layer_layout);
            if layer.reconcile(ctx.queue) {
                log::trace!("uploaded tile layer {}", draw.id);
            }
            layer.write_uniform(ctx.queue, draw.offset + region.shift);
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera tilemap pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_viewport(region.x, region.y, region.width, region.height, 0.0, 1.0);
        rpass.set_bind_group(0, map_bind_group, &[]);
        rpass.set_vertex_buffer(0, pipeline.quad_vbo.slice(..));
        rpass.set_index_buffer(pipeline.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for draw in &order {
            let Some(bind_group) = self.layers.get(&draw.id).and_then(|l| l.bind_group()) else {
                continue;
            };
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.draw_indexed(0..6, 0, 0..1);
        }
    }

    /// Cell of layer `id` under the surface pixel `(x, y)`.
    ///
    /// `None` if the pixel is outside the map region or the layer does not
    /// exist. The cell itself may lie outside the layer's grid.
    pub fn pick_cell(&self, id: u32, x: f32, y: f32, camera: Vec2) -> Option<(i64, i64)> {
        if !self.view.region_contains(x, y) {
            return None;
        }
        let layer = self.layers.get(&id)?;
        let origin = self.view.origin();
        Some(self.view.pick_cell(x - origin.x, y - origin.y, camera, layer.scroll()))
    }

    /// Surface rectangle of cell `(cx, cy)` in layer `id`, `None` if the
    /// layer does not exist. The rect may extend past the map region.
    pub fn cell_rect(&self, id: u32, cx: i64, cy: i64, camera: Vec2) -> Option<Rect> {
        let layer = self.layers.get(&id)?;
        let mut rect = self.view.cell_rect(cx, cy, camera, layer.scroll());
        rect.origin += self.view.origin();
        Some(rect)
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn poll_sheet(&mut self) -> bool {
        let Some(request) = self.sheet.request.as_ref() else {
            return false;
        };
        match request.status() {
            ImageStatus::Pending => false,
            ImageStatus::Failed(e) => {
                log::error!("sprite sheet unavailable, map will not draw: {e}");
                self.sheet.request = None;
                false
            }
            ImageStatus::Ready(image) => {
                let (w, h) = image.dimensions();
                log::info!("sprite sheet `{}` ready ({w}x{h})", request.id());
                self.sheet.request = None;
                self.sheet.image = Some(image);
                self.sheet.view = None;
                self.map_bind_group = None;
                true
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), GfxError> {
        if self
            .pipeline
            .as_ref()
            .is_some_and(|p| p.format == ctx.surface_format)
        {
            return Ok(());
        }

        self.pipeline = Some(TileMapPipeline::new(ctx.device, ctx.surface_format)?);

        // Bind groups belong to the old layouts.
        self.map_bind_group = None;
        for layer in self.layers.values_mut() {
            layer.drop_gpu();
        }
        Ok(())
    }

    fn ensure_sheet_texture(&mut self, ctx: &RenderCtx<'_>) {
        if self.sheet.view.is_some() {
            return;
        }
        let Some(image) = self.sheet.image.as_ref() else { return };

        let texture = resources::rgba_texture(
            ctx.device,
            ctx.queue,
            "tessera sprite sheet",
            wgpu::TextureFormat::Rgba8UnormSrgb,
            image.width(),
            image.height(),
            image.as_raw(),
        );
        self.sheet.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.map_bind_group = None;
    }

    fn ensure_map_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.map_bind_group.is_some() {
            return;
        }
        let (Some(pipeline), Some(sheet_view)) = (self.pipeline.as_ref(), self.sheet.view.as_ref())
        else {
            return;
        };

        let sampler = resources::sampler(
            ctx.device,
            "tessera sprite sampler",
            self.filter.mode(),
            wgpu::AddressMode::ClampToEdge,
        );

        self.map_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera tilemap map bind group"),
            layout: &pipeline.map_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: pipeline.map_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(sheet_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        }));
    }
}

/// Map region clipped to the surface, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Region {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    /// Sheet-pixel shift for a region whose origin was clipped away.
    shift: Vec2,
}

fn visible_region(view: &MapView, surface: Viewport) -> Option<Region> {
    if !surface.is_valid() {
        return None;
    }
    let origin = view.origin();
    let size = view.viewport();

    let x0 = origin.x.max(0.0);
    let y0 = origin.y.max(0.0);
    let x1 = (origin.x + size.width).min(surface.width);
    let y1 = (origin.y + size.height).min(surface.height);

    if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
        return None;
    }

    Some(Region {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        shift: Vec2::new(x0 - origin.x, y0 - origin.y) / view.scale(),
    })
}
