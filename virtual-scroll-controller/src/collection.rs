use alloc::vec::Vec;

use virtual_scroll::{Range, WindowMode};

use crate::ScrollKey;

/// The host's ordered item collection, as seen by the controller.
///
/// The collection owns an index window (`start_index..stop_index`) that its own iteration
/// honours. The controller is the only writer of that window.
pub trait ItemCollection {
    type Key: ScrollKey;

    fn count(&self) -> usize;

    fn key_at(&self, index: usize) -> Option<Self::Key>;

    fn index_by_key(&self, key: &Self::Key) -> Option<usize>;

    fn set_indexes(&mut self, start: usize, stop: usize);

    /// Clears the index window so that iteration covers the whole collection again.
    fn reset_indexes(&mut self);

    fn start_index(&self) -> usize;

    fn stop_index(&self) -> usize;

    /// Data-driven height of the item at `index`, read from `property`.
    fn item_height(&self, index: usize, property: &str) -> Option<u32> {
        let _ = (index, property);
        None
    }
}

/// A collection bound to the window mode chosen at configuration time.
///
/// - [`WindowMode::Remove`]: only items inside the window are mounted.
/// - [`WindowMode::Hide`]: every item is mounted; items outside the window are hidden.
#[derive(Clone, Debug)]
pub struct WindowedCollection<C> {
    collection: C,
    mode: WindowMode,
}

impl<C: ItemCollection> WindowedCollection<C> {
    pub fn new(collection: C, mode: WindowMode) -> Self {
        Self { collection, mode }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn get(&self) -> &C {
        &self.collection
    }

    pub fn get_mut(&mut self) -> &mut C {
        &mut self.collection
    }

    pub fn into_inner(self) -> C {
        self.collection
    }

    pub fn count(&self) -> usize {
        self.collection.count()
    }

    pub fn window(&self) -> Range {
        Range::new(self.collection.start_index(), self.collection.stop_index())
    }

    /// Writes `range` as the index window, clamped against the collection's current count.
    pub fn apply(&mut self, range: Range) -> Range {
        let count = self.collection.count();
        let clamped = range.clamped(count);
        if clamped != range {
            vwarn!(
                start = range.start,
                stop = range.stop,
                count,
                "index window overshoots the collection, clamping"
            );
        }
        self.collection.set_indexes(clamped.start, clamped.stop);
        clamped
    }

    /// Restores the full index range.
    pub fn detach(&mut self) {
        self.collection.reset_indexes();
    }

    /// Visits every mounted item as `(index, hidden)`.
    pub fn for_each_mounted(&self, mut f: impl FnMut(usize, bool)) {
        let window = self.window().clamped(self.collection.count());
        match self.mode {
            WindowMode::Remove => {
                for index in window.start..window.stop {
                    f(index, false);
                }
            }
            WindowMode::Hide => {
                for index in 0..self.collection.count() {
                    f(index, !window.contains(index));
                }
            }
        }
    }

    /// Data-driven heights for the whole collection, or `None` if any item lacks one.
    pub fn data_heights(&self, property: &str) -> Option<Vec<u32>> {
        let count = self.collection.count();
        let mut heights = Vec::with_capacity(count);
        for index in 0..count {
            match self.collection.item_height(index, property) {
                Some(height) => heights.push(height),
                None => {
                    vwarn!(index, property, "item has no data-driven height");
                    return None;
                }
            }
        }
        Some(heights)
    }
}
