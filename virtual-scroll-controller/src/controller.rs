use alloc::boxed::Box;
use core::fmt;

use virtual_scroll::{
    ContainerHeightsData, ContainerHeightsUpdate, Direction, Range, ShiftResult, TriggerState,
    VirtualScroll,
};

use crate::anchor::{capture_edge_item, scroll_top_to_edge_item};
use crate::completion::{Resolver, completion};
use crate::key::KeySet;
use crate::pending::{Cancel, PendingSlot};
use crate::{
    Border, Clock, Completion, ControllerOptions, ControllerOutput, DimensionProvider,
    EdgeItemParams, InertialScrollDetector, ItemCollection, ScrollError, ShadowVisibility,
    WindowedCollection,
};

/// Inputs for [`ScrollController::update`]. Every field is optional.
pub struct UpdateParams<C> {
    /// A new collection. Passing one always counts as an identity change.
    pub collection: Option<C>,
    pub options: Option<ControllerOptions>,
    pub container: ContainerHeightsUpdate,
}

impl<C> Default for UpdateParams<C> {
    fn default() -> Self {
        Self {
            collection: None,
            options: None,
            container: ContainerHeightsUpdate::default(),
        }
    }
}

/// A scroll event reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollParams {
    pub scroll_top: u64,
    pub viewport: Option<u32>,
    pub scroll_height: Option<u64>,
}

impl ScrollParams {
    pub fn new(scroll_top: u64) -> Self {
        Self {
            scroll_top,
            ..Self::default()
        }
    }
}

type ScrollCallback = Box<dyn FnOnce(usize)>;

struct ScrollToItemRequest<K> {
    key: K,
    to_bottom: bool,
    force: bool,
    callback: ScrollCallback,
    resolver: Resolver<Option<usize>>,
}

impl<K> Cancel for ScrollToItemRequest<K> {
    fn cancel(self, reason: ScrollError) {
        vdebug!(?reason, "scroll_to_item cancelled");
        self.resolver.resolve(Err(reason));
    }
}

impl<K: fmt::Debug> fmt::Debug for ScrollToItemRequest<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollToItemRequest")
            .field("key", &self.key)
            .field("to_bottom", &self.to_bottom)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

/// A scroll-to-item whose window is applied and which waits for the next render.
struct CompleteScrollToItem {
    index: usize,
    to_bottom: bool,
    callback: ScrollCallback,
    resolver: Resolver<Option<usize>>,
}

impl Cancel for CompleteScrollToItem {
    fn cancel(self, reason: ScrollError) {
        vdebug!(?reason, index = self.index, "scroll_to_item completion cancelled");
        self.resolver.resolve(Err(reason));
    }
}

impl fmt::Debug for CompleteScrollToItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompleteScrollToItem")
            .field("index", &self.index)
            .field("to_bottom", &self.to_bottom)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ShiftRequest {
    direction: Direction,
    resolver: Resolver<Option<ShiftResult>>,
}

impl Cancel for ShiftRequest {
    fn cancel(self, reason: ScrollError) {
        vdebug!(?reason, "shift_to_direction cancelled");
        self.resolver.resolve(Err(reason));
    }
}

/// Binds a [`VirtualScroll`] engine to one item collection and one render cycle.
///
/// This type does not hold any UI objects. The host drives it by calling:
/// - `update` when options, the collection or container measurements change
/// - `scroll_position_change` for every scroll event (raw, then virtual)
/// - `set_rendering(true/false)` around each render pass, followed by
///   `continue_scroll_to_item_if_need` and `complete_virtual_scroll_if_need`
/// - `tick` on every frame/timer turn, to let debounced work run
///
/// Every call returns a [`ControllerOutput`] patch. Index windows and placeholders are only
/// written while no render is in flight, and always together.
pub struct ScrollController<C: ItemCollection> {
    options: ControllerOptions,
    clock: Box<dyn Clock>,
    collection: Option<WindowedCollection<C>>,
    virtual_scroll: Option<VirtualScroll>,
    inertial: InertialScrollDetector,
    trigger_state: TriggerState,
    container: ContainerHeightsData,
    rendered_keys: KeySet<C::Key>,
    edge_item: Option<EdgeItemParams<C::Key>>,
    last_scroll_top: u64,
    active_element: Option<usize>,
    /// Offset of a scroll the controller asked the host to perform and has not seen yet.
    fake_scroll: Option<u64>,
    rendering: bool,
    rendered_since_apply: bool,
    last_applied: Option<Range>,
    apply_deferred: bool,
    deferred_scroll_top: Option<u64>,
    continue_scroll_to_item: PendingSlot<ScrollToItemRequest<C::Key>>,
    complete_scroll_to_item: PendingSlot<CompleteScrollToItem>,
    pending_shift: PendingSlot<ShiftRequest>,
}

impl<C: ItemCollection> ScrollController<C> {
    pub fn new(options: ControllerOptions, clock: impl Clock + 'static) -> Self {
        let container = ContainerHeightsData {
            viewport: options
                .virtual_scroll_config
                .as_ref()
                .and_then(|c| c.viewport_height)
                .unwrap_or(0),
            ..ContainerHeightsData::default()
        };
        Self {
            inertial: InertialScrollDetector::new(&options.platform),
            options,
            clock: Box::new(clock),
            collection: None,
            virtual_scroll: None,
            trigger_state: TriggerState::default(),
            container,
            rendered_keys: KeySet::default(),
            edge_item: None,
            last_scroll_top: 0,
            active_element: None,
            fake_scroll: None,
            rendering: false,
            rendered_since_apply: false,
            last_applied: None,
            apply_deferred: false,
            deferred_scroll_top: None,
            continue_scroll_to_item: PendingSlot::default(),
            complete_scroll_to_item: PendingSlot::default(),
            pending_shift: PendingSlot::default(),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn collection(&self) -> Option<&C> {
        self.collection.as_ref().map(WindowedCollection::get)
    }

    pub fn collection_mut(&mut self) -> Option<&mut C> {
        self.collection.as_mut().map(WindowedCollection::get_mut)
    }

    pub fn windowed_collection(&self) -> Option<&WindowedCollection<C>> {
        self.collection.as_ref()
    }

    pub fn virtual_scroll(&self) -> Option<&VirtualScroll> {
        self.virtual_scroll.as_ref()
    }

    pub fn inertial_scroll(&self) -> &InertialScrollDetector {
        &self.inertial
    }

    pub fn inertial_scroll_mut(&mut self) -> &mut InertialScrollDetector {
        &mut self.inertial
    }

    /// Runs `callback` once momentum scrolling settles (right away if it is not in progress).
    ///
    /// Queued callbacks run from [`Self::tick`], before the controller's own deferred work.
    pub fn call_after_scroll_stopped(&mut self, callback: impl FnOnce() + 'static) {
        self.inertial.call_after_scroll_stopped(callback);
    }

    /// Resolves once momentum scrolling settles, as observed by [`Self::tick`].
    pub fn scroll_stopped(&mut self) -> Completion<()> {
        self.inertial.scroll_stopped()
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger_state
    }

    pub fn container_heights(&self) -> ContainerHeightsData {
        self.container
    }

    pub fn last_scroll_top(&self) -> u64 {
        self.last_scroll_top
    }

    pub fn active_element_index(&self) -> Option<usize> {
        self.active_element
    }

    pub fn edge_item(&self) -> Option<&EdgeItemParams<C::Key>> {
        self.edge_item.as_ref()
    }

    /// `false` while the controller waits for the scroll event of an offset it emitted.
    ///
    /// The event is recognized by its offset. If the host never reports it, the next event at
    /// any other offset is treated as a real scroll.
    pub fn is_real_scroll(&self) -> bool {
        self.fake_scroll.is_none()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// `true` while a scroll-to-item or a shift is waiting to run or to complete.
    pub fn has_pending_operations(&self) -> bool {
        self.continue_scroll_to_item.is_pending()
            || self.complete_scroll_to_item.is_pending()
            || self.pending_shift.is_pending()
    }

    pub fn is_key_rendered(&self, key: &C::Key) -> bool {
        self.rendered_keys.contains(key)
    }

    /// Keys that have been part of an applied window since the last collection reset.
    pub fn rendered_keys(&self) -> impl Iterator<Item = &C::Key> {
        self.rendered_keys.iter()
    }

    pub fn rendered_keys_len(&self) -> usize {
        self.rendered_keys.len()
    }

    /// `true` if the window already touches that edge, or virtualization is inactive.
    pub fn is_range_on_edge(&self, direction: Direction) -> bool {
        self.virtual_scroll
            .as_ref()
            .is_none_or(|v| v.is_range_on_edge(direction))
    }

    pub fn shadow_visibility(&self) -> ShadowVisibility {
        let viewport = self.container.viewport as u64;
        let windowed_up = self.virtual_scroll.as_ref().is_some_and(|v| v.range().start > 0);
        let windowed_down = self
            .virtual_scroll
            .as_ref()
            .is_some_and(|v| v.range().stop < v.item_count());
        ShadowVisibility {
            up: self.last_scroll_top > 0 || windowed_up,
            down: windowed_down
                || self.last_scroll_top.saturating_add(viewport) < self.container.scroll,
        }
    }

    /// Reconfigures the controller.
    ///
    /// The engine is (re)initialized when the collection identity, the virtualization
    /// config or the force flag changes.
    pub fn update(&mut self, params: UpdateParams<C>) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        let mut reinit = false;

        if let Some(options) = params.options {
            let virtual_changed = options.virtual_scroll_config
                != self.options.virtual_scroll_config
                || options.force_virtual_scroll != self.options.force_virtual_scroll;
            self.inertial.set_platform(&options.platform);
            self.options = options;
            if virtual_changed {
                self.rebind_collection_mode();
                reinit = true;
            }
        }

        if let Some(collection) = params.collection {
            vdebug!(count = collection.count(), "collection changed");
            if let Some(mut old) = self.collection.take() {
                old.detach();
            }
            self.collection = Some(WindowedCollection::new(collection, self.window_mode()));
            self.rendered_keys.clear();
            self.edge_item = None;
            self.active_element = None;
            self.last_scroll_top = 0;
            self.deferred_scroll_top = None;
            self.fake_scroll = None;
            self.last_applied = None;
            reinit = true;
        }

        if !params.container.is_empty() {
            self.apply_container_heights_data(params.container);
        }

        if reinit {
            let anchor = self.active_element.unwrap_or(0);
            self.reinit_virtual_scroll(anchor, &mut out);
        }
        out.shadow_visibility = Some(self.shadow_visibility());
        out
    }

    fn window_mode(&self) -> virtual_scroll::WindowMode {
        self.options
            .virtual_scroll_config
            .as_ref()
            .map(|c| c.mode)
            .unwrap_or_default()
    }

    fn rebind_collection_mode(&mut self) {
        let mode = self.window_mode();
        if let Some(windowed) = self.collection.take() {
            let windowed = if windowed.mode() == mode {
                windowed
            } else {
                WindowedCollection::new(windowed.into_inner(), mode)
            };
            self.collection = Some(windowed);
        }
    }

    fn apply_container_heights_data(&mut self, update: ContainerHeightsUpdate) {
        self.container.merge(update);
        if let Some(v) = self.virtual_scroll.as_mut() {
            v.apply_container_heights_data(update);
        }
    }

    fn data_heights(&self) -> Option<alloc::vec::Vec<u32>> {
        let property = self
            .options
            .virtual_scroll_config
            .as_ref()?
            .item_height_property
            .as_deref()?;
        self.collection.as_ref()?.data_heights(property)
    }

    fn reinit_virtual_scroll(&mut self, anchor: usize, out: &mut ControllerOutput<C::Key>) {
        self.virtual_scroll = None;
        self.last_applied = None;
        let Some(count) = self.collection.as_ref().map(WindowedCollection::count) else {
            return;
        };
        if self.options.should_virtualize(count) {
            self.init_virtual_scroll(anchor, out);
        } else if let Some(collection) = self.collection.as_mut() {
            collection.detach();
            let all = Range::new(0, count);
            self.collect_rendered_keys(all, out);
        }
    }

    /// Creates the engine and opens a window around `anchor`.
    fn init_virtual_scroll(&mut self, anchor: usize, out: &mut ControllerOutput<C::Key>) {
        let Some(config) = self.options.virtual_scroll_config.clone() else {
            return;
        };
        let Some(count) = self.collection.as_ref().map(WindowedCollection::count) else {
            return;
        };
        vdebug!(count, anchor, "creating virtual scroll");
        let heights = self.data_heights();
        let mut v = VirtualScroll::new(config);
        v.apply_container_heights_data(ContainerHeightsUpdate {
            viewport: Some(self.container.viewport).filter(|&h| h > 0),
            scroll: Some(self.container.scroll),
            top_trigger: Some(self.container.top_trigger).filter(|&h| h > 0),
            bottom_trigger: Some(self.container.bottom_trigger).filter(|&h| h > 0),
        });
        self.container = v.container_heights();
        v.set_trigger_state(self.trigger_state);
        v.reset_range(anchor, count, heights.as_deref());
        self.virtual_scroll = Some(v);
        self.apply_range(out);
    }

    /// Writes the engine's window and placeholders, or defers them while rendering.
    fn apply_range(&mut self, out: &mut ControllerOutput<C::Key>) {
        if self.rendering {
            vtrace!("render in flight, deferring window application");
            self.apply_deferred = true;
            return;
        }
        let (Some(v), Some(collection)) = (self.virtual_scroll.as_ref(), self.collection.as_mut())
        else {
            return;
        };
        let applied = collection.apply(v.range());
        if self.last_applied != Some(applied) {
            self.last_applied = Some(applied);
            self.rendered_since_apply = false;
        }
        out.range = Some(applied);
        out.placeholders = Some(v.placeholders());
        self.collect_rendered_keys(applied, out);
    }

    fn collect_rendered_keys(&mut self, range: Range, out: &mut ControllerOutput<C::Key>) {
        if !self.options.notify_keys_rendered {
            return;
        }
        let Some(collection) = self.collection.as_ref() else {
            return;
        };
        for index in range.start..range.stop {
            if let Some(key) = collection.get().key_at(index) {
                if self.rendered_keys.insert(key.clone()) {
                    out.added_keys.push(key);
                }
            }
        }
    }

    /// Handles a scroll event.
    ///
    /// With `is_virtual == false` this only records the offset, feeds the inertial detector
    /// and updates the active element. With `is_virtual == true` the engine is asked for a
    /// window at the new offset, unless the event was produced by the controller itself.
    pub fn scroll_position_change(
        &mut self,
        params: ScrollParams,
        is_virtual: bool,
    ) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if is_virtual {
            self.virtual_scroll_position_change(params.scroll_top, &mut out);
            return out;
        }

        let update = ContainerHeightsUpdate {
            viewport: params.viewport,
            scroll: params.scroll_height,
            ..ContainerHeightsUpdate::default()
        };
        if !update.is_empty() {
            self.apply_container_heights_data(update);
        }
        self.last_scroll_top = params.scroll_top;
        if self.fake_scroll != Some(params.scroll_top) {
            self.inertial.scroll_event(self.clock.now_ms());
        }
        self.active_element = self
            .virtual_scroll
            .as_ref()
            .and_then(|v| v.get_active_element_index(params.scroll_top));
        out.shadow_visibility = Some(self.shadow_visibility());
        out
    }

    fn virtual_scroll_position_change(
        &mut self,
        scroll_top: u64,
        out: &mut ControllerOutput<C::Key>,
    ) {
        if self.fake_scroll.take() == Some(scroll_top) {
            vtrace!(scroll_top, "ignoring controller-produced scroll");
            return;
        }
        let Some(v) = self.virtual_scroll.as_mut() else {
            return;
        };
        if self.rendering || v.range_changed() {
            self.deferred_scroll_top = Some(scroll_top);
            return;
        }
        let res = v.shift_range_to_scroll_position(scroll_top);
        if res.range_changed {
            self.apply_range(out);
        }
    }

    /// Brackets a host render pass. Windows produced while rendering are held back until
    /// [`Self::complete_virtual_scroll_if_need`].
    pub fn set_rendering(&mut self, rendering: bool) {
        self.rendering = rendering;
        if rendering {
            self.rendered_since_apply = true;
        }
    }

    pub fn set_trigger_visibility(&mut self, direction: Direction, visible: bool) {
        self.trigger_state.set(direction, visible);
        if let Some(v) = self.virtual_scroll.as_mut() {
            v.set_trigger_state(self.trigger_state);
        }
    }

    /// Scrolls to the item with `key`.
    ///
    /// If the item can be reached inside the current window, `callback(index)` runs right away
    /// and the completion is resolved. Otherwise the request waits for inertial scrolling to
    /// stop, the window is reset around the item, and `callback(index)` runs after the next
    /// render (see [`Self::complete_virtual_scroll_if_need`]).
    ///
    /// Unknown keys resolve to `Ok(None)`. A newer request rejects an older pending one with
    /// [`ScrollError::Superseded`].
    pub fn scroll_to_item(
        &mut self,
        key: C::Key,
        to_bottom: bool,
        force: bool,
        callback: impl FnOnce(usize) + 'static,
    ) -> Completion<Option<usize>> {
        let Some(index) = self
            .collection
            .as_ref()
            .and_then(|c| c.get().index_by_key(&key))
        else {
            vdebug!("scroll_to_item: key not found");
            return Completion::ready(None);
        };

        self.continue_scroll_to_item.cancel(ScrollError::Superseded);
        self.complete_scroll_to_item.cancel(ScrollError::Superseded);

        let reachable = self
            .virtual_scroll
            .as_ref()
            .is_none_or(|v| !v.range_changed() && v.can_scroll_to_item(index, to_bottom, force));
        if reachable {
            vtrace!(index, "scroll_to_item: inside the window");
            callback(index);
            return Completion::ready(Some(index));
        }

        vdebug!(index, to_bottom, force, "scroll_to_item: window reset required");
        let (resolver, completion) = completion();
        self.continue_scroll_to_item.supersede(ScrollToItemRequest {
            key,
            to_bottom,
            force,
            callback: Box::new(callback),
            resolver,
        });
        completion
    }

    /// Runs a pending scroll-to-item reset once inertial scrolling stopped and no render is in
    /// flight. Call after every render pass.
    pub fn continue_scroll_to_item_if_need(&mut self) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if self.rendering || self.inertial.is_scrolling() {
            return out;
        }
        if let Some(request) = self.continue_scroll_to_item.take() {
            self.continue_scroll_to_item(request, &mut out);
        }
        out
    }

    fn continue_scroll_to_item(
        &mut self,
        request: ScrollToItemRequest<C::Key>,
        out: &mut ControllerOutput<C::Key>,
    ) {
        let Some(index) = self
            .collection
            .as_ref()
            .and_then(|c| c.get().index_by_key(&request.key))
        else {
            request.resolver.resolve(Ok(None));
            return;
        };
        let complete = CompleteScrollToItem {
            index,
            to_bottom: request.to_bottom,
            callback: request.callback,
            resolver: request.resolver,
        };
        let Some(count) = self.collection.as_ref().map(WindowedCollection::count) else {
            return;
        };
        let heights = self.data_heights();
        let Some(v) = self.virtual_scroll.as_mut() else {
            self.finish_scroll_to_item(complete, out);
            return;
        };
        let unconfirmed = v.range_changed();
        if !unconfirmed && v.can_scroll_to_item(index, request.to_bottom, request.force) {
            self.finish_scroll_to_item(complete, out);
            return;
        }
        let res = v.reset_range(index, count, heights.as_deref());
        self.apply_range(out);
        if unconfirmed || res.range_changed {
            // Completes once the window has been through a render pass.
            self.complete_scroll_to_item.supersede(complete);
        } else {
            self.finish_scroll_to_item(complete, out);
        }
    }

    fn finish_scroll_to_item(
        &mut self,
        complete: CompleteScrollToItem,
        out: &mut ControllerOutput<C::Key>,
    ) {
        let CompleteScrollToItem {
            index,
            to_bottom,
            callback,
            resolver,
        } = complete;
        if let Some(v) = self.virtual_scroll.as_ref() {
            let viewport = v.container_heights().viewport as u64;
            let scroll_top = if to_bottom {
                v.item_offset(index + 1).saturating_sub(viewport)
            } else {
                v.item_offset(index)
            };
            out.scroll_top = Some(scroll_top);
            self.fake_scroll = Some(scroll_top);
        }
        vdebug!(index, "scroll_to_item complete");
        callback(index);
        resolver.resolve(Ok(Some(index)));
    }

    /// Finalizes work that had to wait for a render pass. Call after every render pass.
    ///
    /// Confirms the rendered window, completes a pending scroll-to-item and applies the
    /// latest scroll offset that arrived while the window was locked.
    pub fn complete_virtual_scroll_if_need(&mut self) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if self.rendering {
            return out;
        }
        if self.apply_deferred {
            self.apply_deferred = false;
            self.apply_range(&mut out);
            return out;
        }
        if !self.rendered_since_apply {
            // The last window has not been through a render pass yet.
            return out;
        }
        let Some(v) = self.virtual_scroll.as_mut() else {
            return out;
        };
        v.set_range_applied();

        if let Some(complete) = self.complete_scroll_to_item.take() {
            self.deferred_scroll_top = None;
            self.finish_scroll_to_item(complete, &mut out);
        } else if let Some(scroll_top) = self.deferred_scroll_top.take() {
            self.virtual_scroll_position_change(scroll_top, &mut out);
        }
        self.run_pending_shift(&mut out);
        out.shadow_visibility = Some(self.shadow_visibility());
        out
    }

    /// Shifts the window one segment toward `direction`.
    ///
    /// Resolves to `Ok(None)` when virtualization is inactive, the window already sits on that
    /// edge, or another window change is still waiting to be rendered. The shift itself runs
    /// from [`Self::tick`] or [`Self::complete_virtual_scroll_if_need`] once inertial
    /// scrolling stopped.
    pub fn shift_to_direction(&mut self, direction: Direction) -> Completion<Option<ShiftResult>> {
        let Some(v) = self.virtual_scroll.as_ref() else {
            return Completion::ready(None);
        };
        if v.is_range_on_edge(direction) || v.range_changed() {
            return Completion::ready(None);
        }
        let (resolver, completion) = completion();
        self.pending_shift.supersede(ShiftRequest {
            direction,
            resolver,
        });
        completion
    }

    fn run_pending_shift(&mut self, out: &mut ControllerOutput<C::Key>) {
        if self.rendering || self.inertial.is_scrolling() {
            return;
        }
        let Some(request) = self.pending_shift.take() else {
            return;
        };
        let Some(v) = self.virtual_scroll.as_mut() else {
            request.resolver.resolve(Ok(None));
            return;
        };
        if v.range_changed() {
            // One window change at a time; retry after the next render.
            self.pending_shift.restore(request);
            return;
        }
        if v.is_range_on_edge(request.direction) {
            request.resolver.resolve(Ok(None));
            return;
        }
        let res = v.shift_range(request.direction);
        self.apply_range(out);
        request.resolver.resolve(Ok(Some(res)));
    }

    /// Advances debounce timers from the clock and runs work queued behind inertial scrolling.
    pub fn tick(&mut self) -> ControllerOutput<C::Key> {
        let now_ms = self.clock.now_ms();
        if self.inertial.tick(now_ms) {
            vtrace!(now_ms, "scrolling stopped");
        }
        let mut out = ControllerOutput::default();
        if self.rendering || self.inertial.is_scrolling() {
            return out;
        }
        if let Some(request) = self.continue_scroll_to_item.take() {
            self.continue_scroll_to_item(request, &mut out);
        }
        self.run_pending_shift(&mut out);
        out
    }

    /// Lazily initializes the engine once the collection crosses the threshold.
    fn ensure_virtual_scroll(&mut self, out: &mut ControllerOutput<C::Key>) -> bool {
        if self.virtual_scroll.is_some() {
            return true;
        }
        let Some(count) = self.collection.as_ref().map(WindowedCollection::count) else {
            return false;
        };
        if !self.options.should_virtualize(count) {
            return false;
        }
        let anchor = self.active_element.unwrap_or(0);
        self.init_virtual_scroll(anchor, out);
        false
    }

    /// Call after `count` items were inserted before `at_index` in the collection.
    pub fn handle_add_items(
        &mut self,
        at_index: usize,
        count: usize,
        direction: Option<Direction>,
    ) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if !self.ensure_virtual_scroll(&mut out) {
            if self.virtual_scroll.is_none() {
                self.collect_rendered_keys(Range::new(at_index, at_index + count), &mut out);
            }
            return out;
        }
        if let Some(v) = self.virtual_scroll.as_mut() {
            v.add_items(at_index, count, self.trigger_state, direction);
        }
        self.apply_range(&mut out);
        out
    }

    /// Call after items `at_index..at_index + count` were removed from the collection.
    pub fn handle_remove_items(&mut self, at_index: usize, count: usize) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        let Some(v) = self.virtual_scroll.as_mut() else {
            return out;
        };
        v.remove_items(at_index, count);
        self.apply_range(&mut out);
        out
    }

    /// Call after a block of items moved: `removed_count` items left `removed_at` and
    /// `added_count` items arrived at `added_at` (indices after the removal).
    pub fn handle_move_items(
        &mut self,
        added_at: usize,
        added_count: usize,
        removed_at: usize,
        removed_count: usize,
    ) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        let Some(v) = self.virtual_scroll.as_mut() else {
            return out;
        };
        v.remove_items(removed_at, removed_count);
        v.add_items(added_at, added_count, self.trigger_state, None);
        self.apply_range(&mut out);
        out
    }

    /// Call after the collection was reset as a whole.
    pub fn handle_reset_items(&mut self) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        self.rendered_keys.clear();
        self.edge_item = None;
        let anchor = self.active_element.unwrap_or(0);
        let Some(count) = self.collection.as_ref().map(WindowedCollection::count) else {
            return out;
        };
        let heights = self.data_heights();
        match self.virtual_scroll.as_mut() {
            Some(v) => {
                v.reset_range(anchor, count, heights.as_deref());
                self.apply_range(&mut out);
            }
            None => self.reinit_virtual_scroll(anchor, &mut out),
        }
        out.shadow_visibility = Some(self.shadow_visibility());
        out
    }

    /// Re-reads data-driven heights from the collection.
    pub fn update_items_heights(&mut self) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        let Some(heights) = self.data_heights() else {
            return out;
        };
        if let Some(v) = self.virtual_scroll.as_mut() {
            v.update_items_heights(&heights);
            self.apply_range(&mut out);
        }
        out
    }

    /// Forwards measured heights of the rendered items (in window order).
    pub fn update_rendered_heights(&mut self, heights: &[u32]) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if let Some(v) = self.virtual_scroll.as_mut() {
            v.update_rendered_heights(heights);
            self.apply_range(&mut out);
        }
        out
    }

    /// Re-applies the engine's window to the collection, whose own index bookkeeping may have
    /// been overwritten by unrelated mutation handling.
    pub fn set_indices_after_collection_change(&mut self) -> ControllerOutput<C::Key> {
        let mut out = ControllerOutput::default();
        if self.virtual_scroll.is_some() {
            self.apply_range(&mut out);
        }
        out
    }

    /// Records the item at the `direction` edge of the viewport before a destructive
    /// re-render.
    pub fn save_edge_item<D>(
        &mut self,
        direction: Direction,
        provider: &D,
        items_container: &D::Container,
        selector: &str,
    ) -> Option<&EdgeItemParams<C::Key>>
    where
        D: DimensionProvider<C::Key> + ?Sized,
    {
        self.edge_item = capture_edge_item(
            direction,
            provider,
            items_container,
            selector,
            self.options.platform.edge_tolerance_px,
        );
        self.edge_item.as_ref()
    }

    /// After the re-render, computes the scroll offset that keeps the saved edge item at its
    /// previous distance from the viewport border. Consumes the saved item.
    pub fn get_scroll_top_to_edge_item<D>(
        &mut self,
        direction: Direction,
        provider: &D,
        items_container: &D::Container,
        selector: &str,
    ) -> Option<u64>
    where
        D: DimensionProvider<C::Key> + ?Sized,
    {
        if self.edge_item.as_ref()?.border != Border::from(direction) {
            return None;
        }
        let params = self.edge_item.take()?;
        scroll_top_to_edge_item(&params, provider, items_container, selector)
    }

    /// Tears down virtualization: pending operations are rejected and the collection's full
    /// index range is restored.
    pub fn destroy(&mut self) {
        vdebug!("destroying scroll controller");
        self.continue_scroll_to_item.cancel(ScrollError::Destroyed);
        self.complete_scroll_to_item.cancel(ScrollError::Destroyed);
        self.pending_shift.cancel(ScrollError::Destroyed);
        self.inertial.reset();
        if let Some(collection) = self.collection.as_mut() {
            collection.detach();
        }
        self.virtual_scroll = None;
        self.edge_item = None;
        self.deferred_scroll_top = None;
        self.apply_deferred = false;
        self.last_applied = None;
        self.fake_scroll = None;
    }

    /// Destroys virtualization and hands the collection back.
    pub fn detach_collection(&mut self) -> Option<C> {
        self.destroy();
        self.rendered_keys.clear();
        self.collection.take().map(WindowedCollection::into_inner)
    }
}

impl<C: ItemCollection> fmt::Debug for ScrollController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollController")
            .field("options", &self.options)
            .field("virtual_scroll", &self.virtual_scroll)
            .field("inertial", &self.inertial)
            .field("trigger_state", &self.trigger_state)
            .field("container", &self.container)
            .field("last_scroll_top", &self.last_scroll_top)
            .field("active_element", &self.active_element)
            .field("fake_scroll", &self.fake_scroll)
            .field("rendering", &self.rendering)
            .finish_non_exhaustive()
    }
}
