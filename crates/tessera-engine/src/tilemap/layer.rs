use crate::assets::{ImageCache, ImageRequest, ImageStatus};
use crate::coords::Vec2;
use crate::gfx::resources;

use super::error::TileError;
use super::grid::{TexelSink, TileGrid};
use super::pipeline::LayerUniform;
use super::tile::TileIndex;

/// GPU mirror of a layer's grid.
struct LayerGpu {
    texture: wgpu::Texture,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Full-grid upload into the mirror texture.
struct QueueSink<'a> {
    queue: &'a wgpu::Queue,
    texture: &'a wgpu::Texture,
}

impl TexelSink for QueueSink<'_> {
    fn upload(&mut self, width: u32, height: u32, texels: &[u8]) {
        resources::write_rgba(self.queue, self.texture, width, height, texels);
    }
}

/// One layer of a tile map.
///
/// The grid is populated from an image whose pixels encode tile indices
/// (red = column, green = row), or supplied directly with
/// [`TileLayer::from_grid`]. Until then the layer is valid but empty and is
/// not drawn.
///
/// Writes go to the CPU grid only. The map re-uploads the whole grid before
/// the next draw if anything changed, so any number of writes between two
/// frames costs one upload.
pub struct TileLayer {
    grid: TileGrid,
    populated: bool,
    scroll: Vec2,
    repeat: bool,
    source: Option<ImageRequest>,
    gpu: Option<LayerGpu>,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            grid: TileGrid::default(),
            populated: false,
            scroll: Vec2::new(1.0, 1.0),
            repeat: false,
            source: None,
            gpu: None,
        }
    }
}

impl TileLayer {
    /// Unpopulated layer with scroll factors of 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer populated from an in-memory grid.
    pub fn from_grid(grid: TileGrid) -> Self {
        Self {
            grid,
            populated: true,
            ..Self::default()
        }
    }

    /// Sets wrapping sampling outside the grid before the layer is first drawn.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self.gpu = None;
        self
    }

    /// Starts loading the layer from `source`.
    ///
    /// `repeat` selects wrapping sampling outside the grid; otherwise edge
    /// cells are clamped.
    pub fn set_source(&mut self, images: &ImageCache, source: &str, repeat: bool) {
        self.source = Some(images.request(source));
        self.repeat = repeat;
        self.poll_source();
    }

    /// Applies a settled source. Returns `true` if the grid was (re)populated.
    ///
    /// A failed source is logged once and leaves the layer empty.
    pub fn poll_source(&mut self) -> bool {
        let Some(request) = self.source.as_ref() else {
            return false;
        };

        match request.status() {
            ImageStatus::Pending => false,
            ImageStatus::Failed(e) => {
                log::error!("tile layer stays empty: {e}");
                self.source = None;
                false
            }
            ImageStatus::Ready(image) => {
                let id = request.id().to_string();
                self.source = None;

                let (width, height) = image.dimensions();
                match TileGrid::from_rgba(width, height, image.as_raw().clone()) {
                    Ok(grid) => {
                        log::info!("tile layer `{id}` populated ({width}x{height} cells)");
                        self.grid = grid;
                        self.populated = true;
                        self.gpu = None;
                        true
                    }
                    Err(e) => {
                        log::error!("tile layer `{id}`: {e}");
                        false
                    }
                }
            }
        }
    }

    /// `true` once the grid holds the source data.
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// `true` while the source image is still decoding.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.source.is_some()
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.grid.contains(x, y)
    }

    #[inline]
    pub fn read(&self, x: i64, y: i64) -> Option<TileIndex> {
        self.grid.read(x, y)
    }

    /// Sets one cell. Visible from the next draw.
    pub fn write(&mut self, x: i64, y: i64, index: TileIndex) -> Result<(), TileError> {
        self.grid.write(x, y, index)
    }

    pub fn fill(&mut self, index: TileIndex) {
        self.grid.fill(index);
    }

    pub fn dump(&self) -> Vec<Vec<TileIndex>> {
        self.grid.dump()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.grid.is_dirty()
    }

    #[inline]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.scroll = Vec2::new(x, y);
    }

    pub fn set_scroll_x(&mut self, x: f32) {
        self.scroll.x = x;
    }

    pub fn set_scroll_y(&mut self, y: f32) {
        self.scroll.y = y;
    }

    #[inline]
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    // ── GPU mirror (driven by the map) ────────────────────────────────────

    /// Creates the mirror with an initial upload if the layer has none.
    pub(crate) fn ensure_gpu(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        if self.gpu.is_some() || !self.populated || self.grid.is_empty() {
            return;
        }

        let texture = resources::rgba_texture(
            device,
            queue,
            "tessera tile layer texture",
            wgpu::TextureFormat::Rgba8Unorm,
            self.grid.width(),
            self.grid.height(),
            self.grid.texels(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address = if self.repeat {
            wgpu::AddressMode::Repeat
        } else {
            wgpu::AddressMode::ClampToEdge
        };
        // Tile indices must never be interpolated.
        let sampler = resources::sampler(
            device,
            "tessera tile layer sampler",
            wgpu::FilterMode::Nearest,
            address,
        );

        let uniform = resources::uniform_buffer::<LayerUniform>(device, "tessera tile layer ubo");

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera tile layer bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.grid.mark_clean();
        self.gpu = Some(LayerGpu {
            texture,
            uniform,
            bind_group,
        });
    }

    /// Discards the mirror; the next `ensure_gpu` rebuilds it from the grid.
    pub(crate) fn drop_gpu(&mut self) {
        self.gpu = None;
    }

    /// Re-uploads the grid if it changed since the last upload.
    pub(crate) fn reconcile(&mut self, queue: &wgpu::Queue) -> bool {
        let Self { grid, gpu, .. } = self;
        let mut sink = gpu.as_ref().map(|gpu| QueueSink {
            queue,
            texture: &gpu.texture,
        });
        flush_pending(grid, sink.as_mut())
    }

    pub(crate) fn write_uniform(&self, queue: &wgpu::Queue, offset: Vec2) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        let u = LayerUniform::new(
            offset.to_array(),
            (self.grid.width(), self.grid.height()),
        );
        queue.write_buffer(&gpu.uniform, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Uploads pending writes into `mirror`. Without a mirror the grid stays
/// dirty; the initial upload in `ensure_gpu` carries those writes.
fn flush_pending<S: TexelSink + ?Sized>(grid: &mut TileGrid, mirror: Option<&mut S>) -> bool {
    mirror.is_some_and(|sink| grid.flush(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MemoryLoader, RgbaImage};

    #[derive(Default)]
    struct RecordingSink {
        uploads: Vec<Vec<u8>>,
    }

    impl TexelSink for RecordingSink {
        fn upload(&mut self, _width: u32, _height: u32, texels: &[u8]) {
            self.uploads.push(texels.to_vec());
        }
    }

    fn map_image() -> RgbaImage {
        // 2x2 cells: (1,0) at (0,0), sentinel elsewhere; blue/alpha vary.
        let mut img = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 0, 255]));
        img.put_pixel(0, 0, image::Rgba([1, 0, 77, 200]));
        img
    }

    #[test]
    fn stays_empty_until_the_source_settles() {
        let images = ImageCache::new(MemoryLoader::default().with("map.png", map_image()));
        let mut layer = TileLayer::new();
        layer.set_source(&images, "map.png", false);

        assert!(!layer.is_populated());
        assert!(layer.is_loading());
        assert_eq!(layer.read(0, 0), None);

        images.pump();
        assert!(layer.poll_source());
        assert!(layer.is_populated());
        assert!(!layer.is_loading());
        assert!(!layer.is_dirty());
        assert_eq!((layer.width(), layer.height()), (2, 2));
        assert_eq!(layer.read(0, 0), Some(TileIndex::new(1, 0)));
        assert_eq!(layer.read(1, 1), Some(TileIndex::EMPTY));
    }

    #[test]
    fn texels_are_copied_one_to_one() {
        let images = ImageCache::new(MemoryLoader::default().with("map.png", map_image()));
        let mut layer = TileLayer::new();
        layer.set_source(&images, "map.png", true);
        images.pump();
        layer.poll_source();

        assert_eq!(&layer.grid().texels()[..4], &[1, 0, 77, 200]);
        assert!(layer.repeat());
    }

    #[test]
    fn in_memory_layers_can_wrap() {
        let layer = TileLayer::from_grid(TileGrid::new(2, 2)).with_repeat(true);
        assert!(layer.repeat());
        assert!(layer.is_populated());
    }

    #[test]
    fn already_decoded_source_populates_immediately() {
        let images = ImageCache::new(MemoryLoader::default().with("map.png", map_image()));
        images.request("map.png");
        images.pump();

        let mut layer = TileLayer::new();
        layer.set_source(&images, "map.png", false);
        assert!(layer.is_populated());
    }

    #[test]
    fn failed_source_leaves_layer_empty() {
        let images = ImageCache::new(MemoryLoader::default());
        let mut layer = TileLayer::new();
        layer.set_source(&images, "missing.png", false);
        images.pump();

        assert!(!layer.poll_source());
        assert!(!layer.is_populated());
        assert!(!layer.is_loading());
        // Settled: polling again is a no-op.
        assert!(!layer.poll_source());
    }

    #[test]
    fn writes_mark_dirty_and_reject_out_of_range() {
        let mut layer = TileLayer::from_grid(TileGrid::new(3, 2));
        assert!(layer.is_populated());
        assert!(!layer.is_dirty());

        layer.write(2, 1, TileIndex::new(4, 4)).unwrap();
        assert!(layer.is_dirty());
        assert_eq!(layer.read(2, 1), Some(TileIndex::new(4, 4)));

        let before = layer.dump();
        assert_eq!(
            layer.write(3, 0, TileIndex::new(0, 0)),
            Err(TileError::OutOfBounds { x: 3, y: 0, width: 3, height: 2 })
        );
        assert_eq!(layer.dump(), before);
    }

    #[test]
    fn scroll_defaults_to_one() {
        let mut layer = TileLayer::new();
        assert_eq!(layer.scroll(), Vec2::new(1.0, 1.0));
        layer.set_scroll_y(0.0);
        assert_eq!(layer.scroll(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn grid_stays_dirty_without_a_mirror() {
        let mut layer = TileLayer::from_grid(TileGrid::new(1, 1));
        layer.write(0, 0, TileIndex::new(0, 0)).unwrap();
        assert!(layer.bind_group().is_none());
        assert!(layer.is_dirty());
    }

    #[test]
    fn reconcile_uploads_once_per_batch_of_writes() {
        let mut layer = TileLayer::from_grid(TileGrid::new(2, 1));
        let mut mirror = RecordingSink::default();

        layer.write(0, 0, TileIndex::new(1, 2)).unwrap();
        layer.write(1, 0, TileIndex::new(3, 4)).unwrap();
        assert!(flush_pending(&mut layer.grid, Some(&mut mirror)));
        assert!(!layer.is_dirty());
        assert_eq!(mirror.uploads.len(), 1);
        assert_eq!(&mirror.uploads[0][..2], &[1, 2]);
        assert_eq!(&mirror.uploads[0][4..6], &[3, 4]);

        // Nothing changed since: no second upload.
        assert!(!flush_pending(&mut layer.grid, Some(&mut mirror)));
        assert_eq!(mirror.uploads.len(), 1);

        layer.write(0, 0, TileIndex::EMPTY).unwrap();
        assert!(flush_pending(&mut layer.grid, Some(&mut mirror)));
        assert_eq!(mirror.uploads.len(), 2);
    }

    #[test]
    fn reconcile_without_a_mirror_keeps_writes_pending() {
        let mut layer = TileLayer::from_grid(TileGrid::new(1, 1));
        layer.write(0, 0, TileIndex::new(5, 6)).unwrap();

        assert!(!flush_pending::<RecordingSink>(&mut layer.grid, None));
        assert!(!flush_pending::<RecordingSink>(&mut layer.grid, None));
        assert!(layer.is_dirty());

        let mut mirror = RecordingSink::default();
        assert!(flush_pending(&mut layer.grid, Some(&mut mirror)));
        assert_eq!(mirror.uploads, vec![vec![5, 6, 0, 255]]);
    }
}
