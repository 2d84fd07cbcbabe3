//! Display slots for the headless gallery grid.

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::entities::{GalleryItem, ThumbnailImage};

#[derive(Debug, Default)]
struct SlotState {
    item: Option<GalleryItem>,
    image: Option<ThumbnailImage>,
    images_bound: usize,
}

/// One recyclable cell of the gallery grid.
///
/// A slot shows either its bound item's thumbnail or a placeholder.
#[derive(Debug)]
pub struct ThumbnailSlot {
    index: usize,
    state: Mutex<SlotState>,
}

impl ThumbnailSlot {
    /// Creates an empty slot at position `index` in the pool.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: Mutex::new(SlotState::default()),
        }
    }

    /// Position of the slot in the pool.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Binds `item` and shows the placeholder until an image arrives.
    pub fn bind_item(&self, item: GalleryItem) {
        let mut state = self.state.lock();
        state.item = Some(item);
        state.image = None;
    }

    /// Unbinds the slot, leaving it empty.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.item = None;
        state.image = None;
    }

    /// Shows `image` in place of the placeholder.
    pub fn bind_image(&self, image: ThumbnailImage) {
        let mut state = self.state.lock();
        state.image = Some(image);
        state.images_bound += 1;
    }

    /// Returns the bound item.
    #[must_use]
    pub fn item(&self) -> Option<GalleryItem> {
        self.state.lock().item.clone()
    }

    /// Returns the image currently shown.
    #[must_use]
    pub fn image(&self) -> Option<ThumbnailImage> {
        self.state.lock().image.clone()
    }

    /// Returns true if an item is bound but no image has arrived yet.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        let state = self.state.lock();
        state.item.is_some() && state.image.is_none()
    }

    /// Total number of images ever bound to this slot.
    #[must_use]
    pub fn images_bound(&self) -> usize {
        self.state.lock().images_bound
    }
}

impl std::fmt::Display for ThumbnailSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        match (&state.item, &state.image) {
            (None, _) => write!(f, "[{:>2}] (empty)", self.index),
            (Some(item), None) => write!(f, "[{:>2}] {item} (placeholder)", self.index),
            (Some(item), Some(image)) => write!(
                f,
                "[{:>2}] {item} ({}x{})",
                self.index,
                image.width(),
                image.height()
            ),
        }
    }
}

/// Shared handle to a slot, compared by identity rather than content.
///
/// Two handles are equal only if they point at the same slot, so a recycled
/// slot keeps the same request-table key whatever it displays.
#[derive(Clone)]
pub struct SlotHandle(Arc<ThumbnailSlot>);

impl SlotHandle {
    /// Wraps a new slot.
    #[must_use]
    pub fn new(slot: ThumbnailSlot) -> Self {
        Self(Arc::new(slot))
    }
}

impl Deref for SlotHandle {
    type Target = ThumbnailSlot;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for SlotHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SlotHandle {}

impl Hash for SlotHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl std::fmt::Debug for SlotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot#{}", self.0.index)
    }
}
