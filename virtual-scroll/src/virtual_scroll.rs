use crate::heights::ItemHeights;
use crate::{
    ContainerHeightsData, ContainerHeightsUpdate, Direction, Placeholders, Range, ShiftResult,
    TriggerState, VirtualScrollConfig,
};

/// The range/placeholder engine.
///
/// This type is UI-agnostic:
/// - It does not hold any UI objects or the item collection itself.
/// - Your adapter drives it with item counts, heights, container measurements and scroll
///   offsets, and applies the returned [`Range`] and [`Placeholders`] together.
///
/// Every operation returns a structurally valid window: `0 <= start <= stop <= item_count`.
#[derive(Clone, Debug)]
pub struct VirtualScroll {
    config: VirtualScrollConfig,
    range: Range,
    placeholders: Placeholders,
    heights: ItemHeights,
    container: ContainerHeightsData,
    trigger_state: TriggerState,
    range_changed: bool,
}

impl VirtualScroll {
    pub fn new(config: VirtualScrollConfig) -> Self {
        vdebug!(
            page_size = config.page_size(),
            segment_size = config.segment_size(),
            "VirtualScroll::new"
        );
        let container = ContainerHeightsData {
            viewport: config.viewport_height.unwrap_or(0),
            scroll: 0,
            top_trigger: config.top_trigger_offset,
            bottom_trigger: config.bottom_trigger_offset,
        };
        Self {
            heights: ItemHeights::new(config.estimated_item_height),
            config,
            range: Range::EMPTY,
            placeholders: Placeholders::default(),
            container,
            trigger_state: TriggerState::default(),
            range_changed: false,
        }
    }

    pub fn config(&self) -> &VirtualScrollConfig {
        &self.config
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn placeholders(&self) -> Placeholders {
        self.placeholders
    }

    pub fn item_count(&self) -> usize {
        self.heights.len()
    }

    pub fn container_heights(&self) -> ContainerHeightsData {
        self.container
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger_state
    }

    pub fn set_trigger_state(&mut self, trigger_state: TriggerState) {
        self.trigger_state = trigger_state;
    }

    /// `true` while a computed window has not been confirmed as rendered.
    pub fn range_changed(&self) -> bool {
        self.range_changed
    }

    /// Confirms that the current window has been applied to the render tree.
    pub fn set_range_applied(&mut self) {
        if self.range_changed {
            vtrace!(start = self.range.start, stop = self.range.stop, "range applied");
        }
        self.range_changed = false;
    }

    pub fn total_height(&self) -> u64 {
        self.heights.total()
    }

    /// Offset of the top edge of `index` within the full (virtual) list.
    pub fn item_offset(&self, index: usize) -> u64 {
        self.heights.offset(index.min(self.item_count()))
    }

    pub fn item_height(&self, index: usize) -> Option<u32> {
        self.heights.height(index)
    }

    pub fn is_item_height_known(&self, index: usize) -> bool {
        self.heights.is_known(index)
    }

    /// The height currently used for items that were never measured.
    pub fn estimated_item_height(&self) -> u32 {
        self.heights.estimate()
    }

    pub fn is_index_rendered(&self, index: usize) -> bool {
        self.range.contains(index)
    }

    fn result(&self, range_changed: bool) -> ShiftResult {
        ShiftResult {
            range: self.range,
            placeholders: self.placeholders,
            range_changed,
        }
    }

    fn set_range(&mut self, range: Range) -> ShiftResult {
        let count = self.item_count();
        let clamped = range.clamped(count);
        if clamped != range {
            vwarn!(
                start = range.start,
                stop = range.stop,
                count,
                "window overshoots the item count, clamping"
            );
        }
        let changed = clamped != self.range;
        if changed {
            vdebug!(
                start = clamped.start,
                stop = clamped.stop,
                prev_start = self.range.start,
                prev_stop = self.range.stop,
                "range changed"
            );
            self.range = clamped;
            self.range_changed = true;
        }
        self.update_placeholders();
        self.result(changed)
    }

    fn update_placeholders(&mut self) {
        let top = self.heights.offset(self.range.start);
        let rendered_end = self.heights.offset(self.range.stop);
        self.placeholders = Placeholders {
            top,
            bottom: self.heights.total().saturating_sub(rendered_end),
        };
    }

    /// Computes a fresh window so that `anchor_index` is visible, centered when possible.
    ///
    /// `items_heights`, when given, are taken as known heights indexed like the collection.
    pub fn reset_range(
        &mut self,
        anchor_index: usize,
        item_count: usize,
        items_heights: Option<&[u32]>,
    ) -> ShiftResult {
        vdebug!(anchor_index, item_count, "reset_range");
        self.heights.reset(item_count, items_heights);
        if item_count == 0 {
            return self.set_range(Range::EMPTY);
        }
        let page = self.config.page_size();
        let anchor = anchor_index.min(item_count - 1);
        let start = anchor
            .saturating_sub(page / 2)
            .min(item_count.saturating_sub(page));
        self.set_range(Range::new(start, start.saturating_add(page)))
    }

    /// Recomputes the window for a scroll offset during live scrolling.
    ///
    /// The window covers every item intersecting the viewport and is padded up to the page
    /// size around it. The result depends only on `scroll_top` and the current heights.
    pub fn shift_range_to_scroll_position(&mut self, scroll_top: u64) -> ShiftResult {
        let count = self.item_count();
        let Some(first) = self.heights.index_at(scroll_top) else {
            return self.set_range(Range::EMPTY);
        };
        let viewport = self.container.viewport as u64;
        let last = if viewport == 0 {
            first
        } else {
            self.heights
                .index_at(scroll_top.saturating_add(viewport - 1))
                .unwrap_or(first)
        };
        let visible = last - first + 1;
        let size = self.config.page_size().max(visible);
        let start = first
            .saturating_sub((size - visible) / 2)
            .min(count.saturating_sub(size));
        vtrace!(scroll_top, first, last, start, "shift_range_to_scroll_position");
        self.set_range(Range::new(start, start.saturating_add(size)))
    }

    /// Moves the window by one segment toward `direction`.
    pub fn shift_range(&mut self, direction: Direction) -> ShiftResult {
        if self.is_range_on_edge(direction) {
            return self.result(false);
        }
        let range = self.shifted(self.range, direction);
        self.set_range(range)
    }

    fn shifted(&self, range: Range, direction: Direction) -> Range {
        let count = self.item_count();
        let page = self.config.page_size();
        let segment = self.config.segment_size();
        match direction {
            Direction::Down => {
                let stop = range.stop.saturating_add(segment).min(count);
                let start = stop.saturating_sub(page).max(range.start);
                Range::new(start, stop)
            }
            Direction::Up => {
                let start = range.start.saturating_sub(segment);
                let stop = start.saturating_add(page).min(count).min(range.stop);
                Range::new(start, stop)
            }
        }
    }

    /// Whether jumping to `index` only needs a scroll within the current window.
    ///
    /// Without `force`, the window must also hold enough content past the item to fill the
    /// viewport, unless the window already touches that edge of the list.
    pub fn can_scroll_to_item(&self, index: usize, to_bottom: bool, force: bool) -> bool {
        if index >= self.item_count() || !self.range.contains(index) {
            return false;
        }
        if force {
            return true;
        }
        let viewport = self.container.viewport as u64;
        if to_bottom {
            let above = self
                .heights
                .offset(index + 1)
                .saturating_sub(self.heights.offset(self.range.start));
            self.range.start == 0 || above >= viewport
        } else {
            let below = self
                .heights
                .offset(self.range.stop)
                .saturating_sub(self.heights.offset(index));
            self.range.stop == self.item_count() || below >= viewport
        }
    }

    /// Adjusts the window after `count` items were inserted before `at_index`.
    ///
    /// `direction` overrides the guessed side of the insertion relative to the window.
    pub fn add_items(
        &mut self,
        at_index: usize,
        count: usize,
        trigger_state: TriggerState,
        direction: Option<Direction>,
    ) -> ShiftResult {
        self.trigger_state = trigger_state;
        if count == 0 {
            return self.result(false);
        }
        let prev_count = self.item_count();
        let at = at_index.min(prev_count);
        let old = self.range;
        self.heights.insert(at, count);
        vdebug!(at, count, prev_count, "add_items");

        if prev_count == 0 || old.is_empty() {
            let page = self.config.page_size();
            return self.set_range(Range::new(at, at.saturating_add(count.min(page))));
        }

        let direction = direction.unwrap_or(if at <= old.start {
            Direction::Up
        } else {
            Direction::Down
        });

        let range = if at < old.start || (at == old.start && direction == Direction::Up) {
            let moved = Range::new(old.start + count, old.stop + count);
            if trigger_state.up {
                self.shifted(moved, Direction::Up)
            } else {
                moved
            }
        } else if at <= old.stop {
            self.trimmed(Range::new(old.start, old.stop + count), trigger_state)
        } else {
            old
        };
        self.set_range(range)
    }

    /// Shrinks a window grown past the page size from the edge whose trigger is hidden.
    fn trimmed(&self, range: Range, trigger_state: TriggerState) -> Range {
        let page = self.config.page_size();
        let excess = range.len().saturating_sub(page);
        if excess == 0 {
            return range;
        }
        if !trigger_state.down {
            Range::new(range.start, range.stop - excess)
        } else if !trigger_state.up {
            Range::new(range.start + excess, range.stop)
        } else {
            range
        }
    }

    /// Adjusts the window after items `at_index..at_index + count` were removed.
    pub fn remove_items(&mut self, at_index: usize, count: usize) -> ShiftResult {
        let prev_count = self.item_count();
        let at = at_index.min(prev_count);
        let count = count.min(prev_count - at);
        if count == 0 {
            return self.result(false);
        }
        self.heights.remove(at, count);
        let new_count = self.item_count();
        vdebug!(at, count, new_count, "remove_items");

        let end = at + count;
        let map = |i: usize| {
            if i >= end {
                i - count
            } else if i > at {
                at
            } else {
                i
            }
        };
        let mut range = Range::new(map(self.range.start), map(self.range.stop)).clamped(new_count);

        let page = self.config.page_size();
        if range.len() < page {
            range.stop = range.start.saturating_add(page).min(new_count);
            range.start = range.stop.saturating_sub(page).min(range.start);
        }
        self.set_range(range)
    }

    /// Replaces the known heights with data-driven heights for the whole collection.
    ///
    /// The window is kept; it is only corrected (and `true` returned) when the new height
    /// list is shorter than the window.
    pub fn update_items_heights(&mut self, items_heights: &[u32]) -> bool {
        let count = items_heights.len();
        self.heights.reset(count, Some(items_heights));
        self.correct_range(count)
    }

    /// Records measured heights of the rendered items, starting at `range.start`.
    pub fn update_rendered_heights(&mut self, rendered_heights: &[u32]) -> bool {
        let count = self.item_count();
        self.heights.set_known(self.range.start, rendered_heights);
        self.correct_range(count)
    }

    fn correct_range(&mut self, count: usize) -> bool {
        let clamped = self.range.clamped(count);
        if clamped != self.range {
            vwarn!(
                start = self.range.start,
                stop = self.range.stop,
                count,
                "range corrected after heights update"
            );
            self.set_range(clamped);
            return true;
        }
        self.update_placeholders();
        false
    }

    pub fn apply_container_heights_data(&mut self, update: ContainerHeightsUpdate) {
        self.container.merge(update);
    }

    /// Maps a scroll offset to the item considered current for navigation and restore.
    pub fn get_active_element_index(&self, scroll_top: u64) -> Option<usize> {
        self.heights.index_at(scroll_top)
    }

    /// `true` when shifting toward `direction` would be a no-op.
    pub fn is_range_on_edge(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.range.start == 0,
            Direction::Down => self.range.stop == self.item_count(),
        }
    }
}
