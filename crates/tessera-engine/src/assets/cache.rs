use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use image::RgbaImage;

use super::error::ImageError;
use super::loader::ImageLoader;

/// Settlement state of an image request.
#[derive(Debug, Clone)]
pub enum ImageStatus {
    Pending,
    Ready(Rc<RgbaImage>),
    Failed(Rc<ImageError>),
}

impl ImageStatus {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, ImageStatus::Pending)
    }
}

type Slot = Rc<RefCell<ImageStatus>>;

/// Handle to one cache entry.
///
/// Every request for the same source id shares the same entry, so all holders
/// observe the same settlement.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    id: Rc<str>,
    slot: Slot,
}

impl ImageRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state of the entry.
    pub fn status(&self) -> ImageStatus {
        self.slot.borrow().clone()
    }

    /// `true` if both handles refer to the same cache entry.
    pub fn same_entry(&self, other: &ImageRequest) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

struct CacheInner {
    loader: Rc<dyn ImageLoader>,
    entries: HashMap<Rc<str>, Slot>,
    queue: VecDeque<ImageRequest>,
}

/// Memoized image decoding keyed by source id.
///
/// The cache is a shared handle: clones refer to the same entries. It is
/// single-threaded. Requests are queued and decoded by [`ImageCache::pump`],
/// which the render loop calls once per frame; completions are therefore
/// delivered on the loop thread between frames.
///
/// Entries are never evicted, cancelled or retried. A failed decode settles
/// its entry as [`ImageStatus::Failed`] for the cache's lifetime.
#[derive(Clone)]
pub struct ImageCache {
    inner: Rc<RefCell<CacheInner>>,
}

impl ImageCache {
    pub fn new(loader: impl ImageLoader + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CacheInner {
                loader: Rc::new(loader),
                entries: HashMap::new(),
                queue: VecDeque::new(),
            })),
        }
    }

    /// Returns the entry for `id`, queueing a decode on first use.
    pub fn request(&self, id: &str) -> ImageRequest {
        let mut inner = self.inner.borrow_mut();

        if let Some((key, slot)) = inner.entries.get_key_value(id) {
            return ImageRequest { id: Rc::clone(key), slot: Rc::clone(slot) };
        }

        let id: Rc<str> = Rc::from(id);
        let slot: Slot = Rc::new(RefCell::new(ImageStatus::Pending));
        inner.entries.insert(Rc::clone(&id), Rc::clone(&slot));

        let request = ImageRequest { id, slot };
        inner.queue.push_back(request.clone());
        log::debug!("queued image `{}`", request.id());
        request
    }

    /// Decodes every queued request and settles its entry.
    ///
    /// Returns the number of entries settled. Requests issued while pumping
    /// (e.g. by a loader) are decoded on the next call.
    pub fn pump(&self) -> usize {
        let (loader, batch) = {
            let mut inner = self.inner.borrow_mut();
            if inner.queue.is_empty() {
                return 0;
            }
            let batch: Vec<ImageRequest> = inner.queue.drain(..).collect();
            (Rc::clone(&inner.loader), batch)
        };

        for request in &batch {
            let status = match loader.load(request.id()) {
                Ok(image) => {
                    log::info!(
                        "loaded image `{}` ({}x{})",
                        request.id(),
                        image.width(),
                        image.height()
                    );
                    ImageStatus::Ready(Rc::new(image))
                }
                Err(e) => {
                    log::error!("{e}");
                    ImageStatus::Failed(Rc::new(e))
                }
            };
            *request.slot.borrow_mut() = status;
        }

        batch.len()
    }

    /// Number of requests waiting for [`ImageCache::pump`].
    pub fn queued(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Number of distinct source ids ever requested.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;

    /// In-memory loader that counts decodes per call.
    #[derive(Default)]
    pub(crate) struct MemoryLoader {
        pub images: HashMap<String, RgbaImage>,
        pub calls: Rc<Cell<usize>>,
    }

    impl MemoryLoader {
        pub(crate) fn with(mut self, id: &str, image: RgbaImage) -> Self {
            self.images.insert(id.to_string(), image);
            self
        }
    }

    impl ImageLoader for MemoryLoader {
        fn load(&self, id: &str) -> Result<RgbaImage, ImageError> {
            self.calls.set(self.calls.get() + 1);
            self.images
                .get(id)
                .cloned()
                .ok_or_else(|| ImageError::NotFound { id: id.to_string() })
        }
    }

    #[test]
    fn requests_stay_pending_until_pumped() {
        let cache = ImageCache::new(MemoryLoader::default().with("a.png", RgbaImage::new(2, 2)));
        let req = cache.request("a.png");
        assert!(req.status().is_pending());

        assert_eq!(cache.pump(), 1);
        match req.status() {
            ImageStatus::Ready(img) => assert_eq!(img.dimensions(), (2, 2)),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn one_decode_per_source() {
        let loader = MemoryLoader::default().with("a.png", RgbaImage::new(1, 1));
        let calls = Rc::clone(&loader.calls);
        let cache = ImageCache::new(loader);

        let first = cache.request("a.png");
        let while_pending = cache.request("a.png");
        assert!(first.same_entry(&while_pending));
        assert_eq!(cache.queued(), 1);

        cache.pump();
        let after = cache.request("a.png");
        assert!(after.same_entry(&first));
        assert_eq!(cache.pump(), 0);

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let cache = ImageCache::new(MemoryLoader::default().with("a.png", RgbaImage::new(1, 1)));
        let other = cache.clone();
        assert!(cache.request("a.png").same_entry(&other.request("a.png")));
    }

    #[test]
    fn failure_reaches_every_waiter() {
        let cache = ImageCache::new(MemoryLoader::default());
        let a = cache.request("missing.png");
        let b = cache.request("missing.png");
        cache.pump();

        for req in [a, b] {
            match req.status() {
                ImageStatus::Failed(e) => assert_eq!(e.id(), "missing.png"),
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn failed_entries_are_not_retried() {
        let loader = MemoryLoader::default();
        let calls = Rc::clone(&loader.calls);
        let cache = ImageCache::new(loader);

        cache.request("missing.png");
        cache.pump();
        let again = cache.request("missing.png");
        assert_eq!(cache.pump(), 0);
        assert!(matches!(again.status(), ImageStatus::Failed(_)));
        assert_eq!(calls.get(), 1);
    }

    struct ReentrantLoader {
        cache: RefCell<Option<ImageCache>>,
    }

    impl ImageLoader for Rc<ReentrantLoader> {
        fn load(&self, id: &str) -> Result<RgbaImage, ImageError> {
            if id == "outer.png" {
                if let Some(cache) = self.cache.borrow().as_ref() {
                    cache.request("inner.png");
                }
            }
            Ok(RgbaImage::new(1, 1))
        }
    }

    #[test]
    fn requests_from_a_loader_are_deferred() {
        let loader = Rc::new(ReentrantLoader { cache: RefCell::new(None) });
        let cache = ImageCache::new(Rc::clone(&loader));
        *loader.cache.borrow_mut() = Some(cache.clone());

        cache.request("outer.png");
        assert_eq!(cache.pump(), 1);
        assert_eq!(cache.queued(), 1);
        assert_eq!(cache.pump(), 1);

        // Break the cycle.
        loader.cache.borrow_mut().take();
    }
}
