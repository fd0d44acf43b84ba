use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// Per-item heights, split into known (measured or data-driven) and estimated entries.
///
/// Estimated entries use the average of the known heights, or a configured fallback
/// while nothing is known yet, so placeholders never collapse to zero.
#[derive(Clone, Debug)]
pub(crate) struct ItemHeights {
    sizes: Vec<u32>,
    known: Vec<bool>,
    known_total: u64,
    known_count: usize,
    estimate: u32,
    fallback: u32,
    sums: Fenwick,
}

impl ItemHeights {
    pub(crate) fn new(fallback: u32) -> Self {
        Self {
            sizes: Vec::new(),
            known: Vec::new(),
            known_total: 0,
            known_count: 0,
            estimate: fallback,
            fallback,
            sums: Fenwick::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Drops everything and starts over with `count` items.
    ///
    /// `heights[i]`, when present, is taken as the known height of item `i`.
    pub(crate) fn reset(&mut self, count: usize, heights: Option<&[u32]>) {
        self.sizes.clear();
        self.known.clear();
        self.known_total = 0;
        self.known_count = 0;
        self.sizes.reserve_exact(count);
        self.known.reserve_exact(count);
        for i in 0..count {
            match heights.and_then(|h| h.get(i)) {
                Some(&h) => {
                    self.sizes.push(h);
                    self.known.push(true);
                    self.known_total = self.known_total.saturating_add(h as u64);
                    self.known_count += 1;
                }
                None => {
                    self.sizes.push(0);
                    self.known.push(false);
                }
            }
        }
        self.refresh(true);
    }

    /// Records known heights for items `start..start + heights.len()`.
    pub(crate) fn set_known(&mut self, start: usize, heights: &[u32]) {
        let end = start.saturating_add(heights.len()).min(self.sizes.len());
        if start >= end {
            return;
        }
        let mut deltas = Vec::new();
        for (index, &height) in (start..end).zip(heights) {
            if self.known[index] {
                self.known_total = self
                    .known_total
                    .saturating_sub(self.sizes[index] as u64)
                    .saturating_add(height as u64);
            } else {
                self.known[index] = true;
                self.known_count += 1;
                self.known_total = self.known_total.saturating_add(height as u64);
            }
            let delta = height as i64 - self.sizes[index] as i64;
            self.sizes[index] = height;
            if delta != 0 {
                deltas.push((index, delta));
            }
        }
        if self.current_estimate() != self.estimate {
            self.refresh(true);
            return;
        }
        for (index, delta) in deltas {
            self.sums.add(index, delta);
        }
    }

    /// Inserts `count` items with unknown heights before `at`.
    pub(crate) fn insert(&mut self, at: usize, count: usize) {
        let at = at.min(self.sizes.len());
        let estimate = self.estimate;
        self.sizes
            .splice(at..at, core::iter::repeat_n(estimate, count));
        self.known.splice(at..at, core::iter::repeat_n(false, count));
        self.refresh(false);
    }

    /// Removes items `at..at + count` (clamped).
    pub(crate) fn remove(&mut self, at: usize, count: usize) {
        let at = at.min(self.sizes.len());
        let end = at.saturating_add(count).min(self.sizes.len());
        for index in at..end {
            if self.known[index] {
                self.known_count -= 1;
                self.known_total = self.known_total.saturating_sub(self.sizes[index] as u64);
            }
        }
        self.sizes.drain(at..end);
        self.known.drain(at..end);
        self.refresh(false);
    }

    pub(crate) fn height(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    pub(crate) fn is_known(&self, index: usize) -> bool {
        self.known.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn estimate(&self) -> u32 {
        self.estimate
    }

    /// Offset of the top edge of item `index` (or the list end past the last item).
    pub(crate) fn offset(&self, index: usize) -> u64 {
        self.sums.prefix_sum(index)
    }

    pub(crate) fn total(&self) -> u64 {
        self.sums.total()
    }

    /// Index of the item covering `offset`, clamped to the last item.
    pub(crate) fn index_at(&self, offset: u64) -> Option<usize> {
        let count = self.sizes.len();
        if count == 0 {
            return None;
        }
        Some(self.sums.lower_bound(offset).min(count - 1))
    }

    fn current_estimate(&self) -> u32 {
        if self.known_count == 0 {
            return self.fallback;
        }
        let count = self.known_count as u64;
        ((self.known_total + count / 2) / count).min(u32::MAX as u64) as u32
    }

    /// Re-derives estimated entries and rebuilds the prefix sums.
    fn refresh(&mut self, force: bool) {
        let estimate = self.current_estimate();
        if force || estimate != self.estimate {
            self.estimate = estimate;
            for (size, &known) in self.sizes.iter_mut().zip(&self.known) {
                if !known {
                    *size = estimate;
                }
            }
        }
        self.sums = Fenwick::from_heights(&self.sizes);
    }
}
