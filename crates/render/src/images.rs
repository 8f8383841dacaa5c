//! Image resolution for complication content.
//!
//! Content refers to images by `ImageHandle`. An `ImageLoader` turns handles
//! into decoded `ImageData`, either inline or through a completion callback
//! that may run on any thread. Results land in `ImageSlots`, shared with the
//! completion callbacks behind a mutex.
//!
//! Every content change bumps a generation counter. A completion carrying an
//! older generation is dropped, so a slow load for superseded content can
//! never overwrite the current content's images.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use complication_types::{ComplicationData, ImageHandle};

use crate::canvas::ImageData;

/// Called with the loaded image, or None when it could not be loaded
pub type ImageCallback = Box<dyn FnOnce(Option<ImageData>) + Send + 'static>;

/// Called whenever the renderer needs a redraw
pub type InvalidateListener = Box<dyn Fn() + Send + Sync + 'static>;

/// Resolves image handles to decoded images
pub trait ImageLoader: Send + Sync {
    /// Load synchronously
    fn resolve(&self, handle: &ImageHandle) -> Option<ImageData>;

    /// Load and report through `on_complete`, possibly from another thread.
    ///
    /// The default resolves inline.
    fn resolve_async(&self, handle: &ImageHandle, on_complete: ImageCallback) {
        on_complete(self.resolve(handle));
    }
}

/// The five image fields a complication can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Icon,
    BurnInIcon,
    SmallImage,
    BurnInSmallImage,
    LargeImage,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 5] = [
        ImageSlot::Icon,
        ImageSlot::BurnInIcon,
        ImageSlot::SmallImage,
        ImageSlot::BurnInSmallImage,
        ImageSlot::LargeImage,
    ];

    pub fn handle(self, data: &ComplicationData) -> Option<&ImageHandle> {
        match self {
            ImageSlot::Icon => data.icon.as_ref(),
            ImageSlot::BurnInIcon => data.burn_in_icon.as_ref(),
            ImageSlot::SmallImage => data.small_image.as_ref(),
            ImageSlot::BurnInSmallImage => data.burn_in_small_image.as_ref(),
            ImageSlot::LargeImage => data.large_image.as_ref(),
        }
    }
}

/// Resolved images for the current content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSlots {
    pub icon: Option<ImageData>,
    pub burn_in_icon: Option<ImageData>,
    pub small_image: Option<ImageData>,
    pub burn_in_small_image: Option<ImageData>,
    pub large_image: Option<ImageData>,
}

impl ImageSlots {
    pub fn set(&mut self, slot: ImageSlot, image: Option<ImageData>) {
        let target = match slot {
            ImageSlot::Icon => &mut self.icon,
            ImageSlot::BurnInIcon => &mut self.burn_in_icon,
            ImageSlot::SmallImage => &mut self.small_image,
            ImageSlot::BurnInSmallImage => &mut self.burn_in_small_image,
            ImageSlot::LargeImage => &mut self.large_image,
        };
        *target = image;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Icon for this frame: the burn-in variant when protecting and present
    pub fn icon_for(&self, burn_in_protection: bool) -> Option<&ImageData> {
        if burn_in_protection {
            self.burn_in_icon.as_ref().or(self.icon.as_ref())
        } else {
            self.icon.as_ref()
        }
    }

    /// Small image for this frame.
    ///
    /// Photos may burn in, so under protection only the dedicated variant
    /// qualifies and there is no fallback to the regular image.
    pub fn small_image_for(&self, burn_in_protection: bool) -> Option<&ImageData> {
        if burn_in_protection {
            self.burn_in_small_image.as_ref()
        } else {
            self.small_image.as_ref()
        }
    }
}

type SharedListener = Arc<dyn Fn() + Send + Sync + 'static>;

/// Shared redraw signal
#[derive(Clone, Default)]
pub struct Invalidator {
    listener: Arc<Mutex<Option<SharedListener>>>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&self, listener: Option<InvalidateListener>) {
        let listener = listener.map(SharedListener::from);
        match self.listener.lock() {
            Ok(mut guard) => *guard = listener,
            Err(poisoned) => *poisoned.into_inner() = listener,
        }
    }

    /// Call the listener, if any. The lock is released first, so the
    /// listener may replace itself or signal again.
    pub fn invalidate(&self) {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

/// How to resolve the images of new content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Resolve before returning; no redraw signal
    Sync,
    /// Resolve through callbacks, signalling a redraw per loaded image
    Async,
}

#[derive(Debug, Default)]
struct SharedSlots {
    slots: ImageSlots,
    generation: u64,
}

/// Read access to the resolved images, held for the duration of a frame
pub struct SlotsGuard<'a> {
    guard: MutexGuard<'a, SharedSlots>,
}

impl Deref for SlotsGuard<'_> {
    type Target = ImageSlots;

    fn deref(&self) -> &ImageSlots {
        &self.guard.slots
    }
}

/// Loads content images into shared slots, discarding stale completions
pub struct ImageResolver {
    loader: Option<Arc<dyn ImageLoader>>,
    shared: Arc<Mutex<SharedSlots>>,
    invalidator: Invalidator,
}

impl ImageResolver {
    pub fn new(invalidator: Invalidator) -> Self {
        Self {
            loader: None,
            shared: Arc::new(Mutex::new(SharedSlots::default())),
            invalidator,
        }
    }

    pub fn set_loader(&mut self, loader: Option<Arc<dyn ImageLoader>>) {
        self.loader = loader;
    }

    pub fn slots(&self) -> SlotsGuard<'_> {
        SlotsGuard {
            guard: self
                .shared
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    /// Forget all images and invalidate pending completions
    pub fn clear(&self) -> u64 {
        let mut shared = self
            .shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.generation += 1;
        shared.slots.clear();
        shared.generation
    }

    /// Start resolving every image of `data`.
    ///
    /// Pending handles are skipped. In async mode each non-empty completion
    /// for the current generation fills its slot and signals a redraw; with
    /// nothing to load, a single redraw is signalled instead.
    pub fn resolve(&self, data: &ComplicationData, mode: LoadMode) {
        let generation = self.clear();

        let requests = ImageSlot::ALL.iter().filter_map(|&slot| {
            slot.handle(data)
                .filter(|handle| !handle.is_placeholder())
                .map(|handle| (slot, handle))
        });

        let Some(loader) = self.loader.as_ref() else {
            if requests.count() > 0 {
                log::debug!("No image loader set, skipping images");
            }
            if mode == LoadMode::Async {
                self.invalidator.invalidate();
            }
            return;
        };

        let mut requested = 0;
        for (slot, handle) in requests {
            requested += 1;
            match mode {
                LoadMode::Sync => {
                    let image = loader.resolve(handle);
                    if image.is_none() {
                        log::warn!("Failed to load {:?} image {:?}", slot, handle);
                    }
                    self.store(generation, slot, image);
                }
                LoadMode::Async => {
                    let shared = Arc::clone(&self.shared);
                    let invalidator = self.invalidator.clone();
                    loader.resolve_async(
                        handle,
                        Box::new(move |image| {
                            complete(&shared, &invalidator, generation, slot, image)
                        }),
                    );
                }
            }
        }

        if requested == 0 && mode == LoadMode::Async {
            self.invalidator.invalidate();
        }
    }

    fn store(&self, generation: u64, slot: ImageSlot, image: Option<ImageData>) {
        let mut shared = self
            .shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if shared.generation == generation {
            shared.slots.set(slot, image);
        }
    }
}

fn complete(
    shared: &Mutex<SharedSlots>,
    invalidator: &Invalidator,
    generation: u64,
    slot: ImageSlot,
    image: Option<ImageData>,
) {
    let Some(image) = image else {
        log::debug!("{:?} image did not load", slot);
        return;
    };

    let applied = {
        let mut shared = shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if shared.generation == generation {
            shared.slots.set(slot, Some(image));
            true
        } else {
            log::debug!(
                "Dropping stale {:?} image (generation {} superseded by {})",
                slot,
                generation,
                shared.generation
            );
            false
        }
    };

    // Outside the lock: the listener may trigger a draw
    if applied {
        invalidator.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockImageLoader;
    use complication_types::{Color, ComplicationText, ImageStyle};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_invalidator() -> (Invalidator, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let invalidator = Invalidator::new();
        let counter = Arc::clone(&count);
        invalidator.set_listener(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        (invalidator, count)
    }

    #[test]
    fn test_sync_resolution_fills_slots_without_signal() {
        let (invalidator, count) = counting_invalidator();
        let icon = ImageData::solid(4, 4, Color::WHITE);
        let loader = MockImageLoader::new().with_image(ImageHandle::resource("icon"), icon.clone());
        let mut resolver = ImageResolver::new(invalidator);
        resolver.set_loader(Some(Arc::new(loader)));

        resolver.resolve(
            &ComplicationData::icon(ImageHandle::resource("icon")),
            LoadMode::Sync,
        );
        assert_eq!(resolver.slots().icon, Some(icon));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_async_signals_once_per_loaded_image() {
        let (invalidator, count) = counting_invalidator();
        let loader = Arc::new(
            MockImageLoader::new()
                .with_image(ImageHandle::resource("a"), ImageData::solid(1, 1, Color::WHITE))
                .with_image(ImageHandle::resource("b"), ImageData::solid(1, 1, Color::BLACK))
                .deferred(),
        );
        let mut resolver = ImageResolver::new(invalidator);
        resolver.set_loader(Some(loader.clone()));

        let data = ComplicationData::short_text(ComplicationText::plain("1"))
            .with_icon(ImageHandle::resource("a"))
            .with_small_image(ImageHandle::resource("b"), ImageStyle::Photo)
            .with_large_image(ImageHandle::resource("missing"));
        resolver.resolve(&data, LoadMode::Async);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(loader.complete_all(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        let slots = resolver.slots();
        assert!(slots.icon.is_some());
        assert!(slots.small_image.is_some());
        assert!(slots.large_image.is_none());
    }

    #[test]
    fn test_async_without_images_signals_once() {
        let (invalidator, count) = counting_invalidator();
        let mut resolver = ImageResolver::new(invalidator);
        resolver.set_loader(Some(Arc::new(MockImageLoader::new())));
        resolver.resolve(
            &ComplicationData::short_text(ComplicationText::plain("1")),
            LoadMode::Async,
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let (invalidator, count) = counting_invalidator();
        let loader = Arc::new(
            MockImageLoader::new()
                .with_image(ImageHandle::resource("old"), ImageData::solid(1, 1, Color::WHITE))
                .deferred(),
        );
        let mut resolver = ImageResolver::new(invalidator);
        resolver.set_loader(Some(loader.clone()));

        resolver.resolve(
            &ComplicationData::icon(ImageHandle::resource("old")),
            LoadMode::Async,
        );
        // Content replaced before the load finished
        resolver.resolve(
            &ComplicationData::short_text(ComplicationText::plain("new")),
            LoadMode::Sync,
        );

        loader.complete_all();
        assert!(resolver.slots().icon.is_none());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_placeholder_handles_are_not_requested() {
        let loader = Arc::new(MockImageLoader::new());
        let mut resolver = ImageResolver::new(Invalidator::new());
        resolver.set_loader(Some(loader.clone()));
        resolver.resolve(
            &ComplicationData::icon(ImageHandle::Placeholder),
            LoadMode::Sync,
        );
        assert_eq!(loader.request_count(), 0);
    }

    #[test]
    fn test_burn_in_variant_preferred_when_protecting() {
        let regular = ImageData::solid(1, 1, Color::WHITE);
        let burn_in = ImageData::solid(1, 1, Color::BLACK);
        let mut slots = ImageSlots::default();
        slots.set(ImageSlot::Icon, Some(regular.clone()));
        assert_eq!(slots.icon_for(true), Some(&regular));

        slots.set(ImageSlot::BurnInIcon, Some(burn_in.clone()));
        assert_eq!(slots.icon_for(true), Some(&burn_in));
        assert_eq!(slots.icon_for(false), Some(&regular));
    }

    #[test]
    fn test_small_image_has_no_burn_in_fallback() {
        let photo = ImageData::solid(1, 1, Color::WHITE);
        let safe = ImageData::solid(1, 1, Color::BLACK);
        let mut slots = ImageSlots::default();
        slots.set(ImageSlot::SmallImage, Some(photo.clone()));
        assert_eq!(slots.small_image_for(false), Some(&photo));
        assert_eq!(slots.small_image_for(true), None);

        slots.set(ImageSlot::BurnInSmallImage, Some(safe.clone()));
        assert_eq!(slots.small_image_for(true), Some(&safe));
    }

    #[test]
    fn test_listener_may_replace_itself() {
        let count = Arc::new(AtomicUsize::new(0));
        let invalidator = Invalidator::new();
        let handle = invalidator.clone();
        let counter = Arc::clone(&count);
        invalidator.set_listener(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // One-shot: unregister from inside the callback
            handle.set_listener(None);
        })));

        invalidator.invalidate();
        invalidator.invalidate();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
