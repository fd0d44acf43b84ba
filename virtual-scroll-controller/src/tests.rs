use crate::*;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use virtual_scroll::{ContainerHeightsUpdate, Direction, Range, VirtualScrollConfig, WindowMode};

#[derive(Clone, Debug, Default)]
struct MockCollection {
    keys: Vec<u64>,
    window: Option<(usize, usize)>,
    heights: Option<Vec<u32>>,
}

impl MockCollection {
    fn new(count: usize) -> Self {
        Self {
            keys: (0..count as u64).collect(),
            ..Self::default()
        }
    }
}

impl ItemCollection for MockCollection {
    type Key = u64;

    fn count(&self) -> usize {
        self.keys.len()
    }

    fn key_at(&self, index: usize) -> Option<u64> {
        self.keys.get(index).copied()
    }

    fn index_by_key(&self, key: &u64) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn set_indexes(&mut self, start: usize, stop: usize) {
        self.window = Some((start, stop));
    }

    fn reset_indexes(&mut self) {
        self.window = None;
    }

    fn start_index(&self) -> usize {
        self.window.map_or(0, |w| w.0)
    }

    fn stop_index(&self) -> usize {
        self.window.map_or(self.keys.len(), |w| w.1)
    }

    fn item_height(&self, index: usize, property: &str) -> Option<u32> {
        if property != "height" {
            return None;
        }
        self.heights.as_ref()?.get(index).copied()
    }
}

/// Items laid out back to back in content coordinates, viewed through a viewport at `top = 0`.
struct MockDimensions {
    viewport_height: f64,
    scroll_top: f64,
    items: Vec<(u64, f64, ItemKind)>,
    item_height: f64,
    sticky_top: f64,
}

impl MockDimensions {
    fn new(keys: impl IntoIterator<Item = u64>, item_height: f64) -> Self {
        Self {
            viewport_height: 400.0,
            scroll_top: 0.0,
            items: keys
                .into_iter()
                .enumerate()
                .map(|(i, key)| (key, i as f64 * item_height, ItemKind::Regular))
                .collect(),
            item_height,
            sticky_top: 0.0,
        }
    }

    fn prepend(&mut self, keys: impl IntoIterator<Item = u64>) {
        let keys: Vec<u64> = keys.into_iter().collect();
        let shift = keys.len() as f64 * self.item_height;
        for item in &mut self.items {
            item.1 += shift;
        }
        let head = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, i as f64 * self.item_height, ItemKind::Regular));
        self.items.splice(0..0, head);
    }
}

impl DimensionProvider<u64> for MockDimensions {
    type Container = ();

    fn viewport_rect(&self) -> ElementRect {
        ElementRect::new(0.0, self.viewport_height)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn for_each_item(&self, _container: &(), _selector: &str, f: &mut dyn FnMut(ItemBox<u64>)) {
        for &(key, top, kind) in &self.items {
            f(ItemBox {
                key,
                rect: ElementRect::new(top - self.scroll_top, self.item_height),
                kind,
            });
        }
    }

    fn sticky_headers_height(&self, border: Border) -> f64 {
        match border {
            Border::Top => self.sticky_top,
            Border::Bottom => 0.0,
        }
    }
}

fn options(page_size: usize) -> ControllerOptions {
    ControllerOptions::new(VirtualScrollConfig::new(page_size).with_viewport_height(400))
}

fn controller(opts: ControllerOptions, count: usize) -> ScrollController<MockCollection> {
    let mut c = ScrollController::new(opts, ManualClock::new(0));
    c.update(UpdateParams {
        collection: Some(MockCollection::new(count)),
        ..UpdateParams::default()
    });
    c
}

/// Simulates one host render pass.
fn render(c: &mut ScrollController<MockCollection>) -> ControllerOutput<u64> {
    c.set_rendering(true);
    c.set_rendering(false);
    let mut out = c.continue_scroll_to_item_if_need();
    let completed = c.complete_virtual_scroll_if_need();
    out.range = completed.range.or(out.range);
    out.placeholders = completed.placeholders.or(out.placeholders);
    out.scroll_top = completed.scroll_top.or(out.scroll_top);
    out.added_keys.extend(completed.added_keys);
    out
}

fn recorder() -> (Rc<Cell<Option<usize>>>, impl FnOnce(usize) + 'static) {
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    (seen, move |index| sink.set(Some(index)))
}

fn window(c: &ScrollController<MockCollection>) -> Option<(usize, usize)> {
    c.collection().and_then(|m| m.window)
}

#[test]
fn update_initializes_window_at_the_top() {
    let mut c = ScrollController::new(options(20), ManualClock::new(0));
    let out = c.update(UpdateParams {
        collection: Some(MockCollection::new(10_000)),
        ..UpdateParams::default()
    });
    assert_eq!(out.range, Some(Range::new(0, 20)));
    assert_eq!(out.placeholders.unwrap().top, 0);
    assert_eq!(out.placeholders.unwrap().bottom, 9_980 * 40);
    assert_eq!(window(&c), Some((0, 20)));
    assert_eq!(
        out.shadow_visibility,
        Some(ShadowVisibility {
            up: false,
            down: true
        })
    );
}

#[test]
fn small_collections_are_not_virtualized() {
    let c = controller(options(20).with_notify_keys_rendered(true), 15);
    assert!(c.virtual_scroll().is_none());
    assert_eq!(window(&c), None);
    assert_eq!(c.rendered_keys_len(), 15);
}

#[test]
fn scroll_to_item_far_away_resets_window_and_marks_scroll_as_fake() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let (seen, callback) = recorder();
    let done = c.scroll_to_item(5_000, false, false, callback);
    assert!(!done.is_resolved());
    assert!(c.has_pending_operations());

    let out = c.continue_scroll_to_item_if_need();
    assert_eq!(out.range, Some(Range::new(4_990, 5_010)));
    assert_eq!(out.placeholders.unwrap().top, 4_990 * 40);
    assert_eq!(seen.get(), None);
    assert!(!done.is_resolved());

    c.set_rendering(true);
    c.set_rendering(false);
    let out = c.complete_virtual_scroll_if_need();
    assert_eq!(out.scroll_top, Some(5_000 * 40));
    assert_eq!(seen.get(), Some(5_000));
    assert_eq!(done.try_take(), Some(Ok(Some(5_000))));
    assert!(!c.has_pending_operations());

    // The host applies the offset; the resulting event is the controller's own.
    assert!(!c.is_real_scroll());
    c.scroll_position_change(ScrollParams::new(200_000), false);
    let out = c.scroll_position_change(ScrollParams::new(200_000), true);
    assert!(out.range.is_none());
    assert!(c.is_real_scroll());
    assert_eq!(c.virtual_scroll().unwrap().range(), Range::new(4_990, 5_010));
}

#[test]
fn scroll_to_item_to_bottom_aligns_item_with_viewport_bottom() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let done = c.scroll_to_item(5_000, true, false, |_| {});
    let out = render(&mut c);
    assert_eq!(out.range, Some(Range::new(4_990, 5_010)));
    assert!(out.scroll_top.is_none());
    assert!(!done.is_resolved());

    let out = render(&mut c);
    assert_eq!(out.scroll_top, Some(5_001 * 40 - 400));
    assert_eq!(done.try_take(), Some(Ok(Some(5_000))));
}

#[test]
fn scroll_to_item_inside_window_runs_immediately() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let (seen, callback) = recorder();
    let done = c.scroll_to_item(5, false, false, callback);
    assert_eq!(seen.get(), Some(5));
    assert_eq!(done.try_take(), Some(Ok(Some(5))));
    assert!(c.is_real_scroll());
}

#[test]
fn scroll_to_item_with_unknown_key_is_a_no_op() {
    let mut c = controller(options(20), 100);
    let (seen, callback) = recorder();
    let done = c.scroll_to_item(99_999, false, false, callback);
    assert_eq!(done.try_take(), Some(Ok(None)));
    assert_eq!(seen.get(), None);
    assert!(!c.has_pending_operations());
}

#[test]
fn scroll_to_item_without_virtualization_calls_back_directly() {
    let mut c = controller(options(20), 10);
    let (seen, callback) = recorder();
    let done = c.scroll_to_item(7, true, false, callback);
    assert_eq!(seen.get(), Some(7));
    assert_eq!(done.try_take(), Some(Ok(Some(7))));
}

#[test]
fn newer_scroll_to_item_supersedes_pending_one() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let (first_seen, first_cb) = recorder();
    let first = c.scroll_to_item(5_000, false, false, first_cb);
    let second = c.scroll_to_item(7_000, false, false, |_| {});
    assert_eq!(first.try_take(), Some(Err(ScrollError::Superseded)));

    let out = render(&mut c);
    assert_eq!(out.range, Some(Range::new(6_990, 7_010)));
    render(&mut c);
    assert_eq!(second.try_take(), Some(Ok(Some(7_000))));
    assert_eq!(first_seen.get(), None);
}

#[test]
fn scroll_to_item_waits_for_inertial_scrolling_on_touch_platforms() {
    let clock = ManualClock::new(0);
    let opts = options(20).with_platform(PlatformConfig::touch());
    let mut c = ScrollController::new(opts, clock.clone());
    c.update(UpdateParams {
        collection: Some(MockCollection::new(10_000)),
        ..UpdateParams::default()
    });
    render(&mut c);

    c.scroll_position_change(ScrollParams::new(100), false);
    assert!(c.inertial_scroll().is_scrolling());

    let done = c.scroll_to_item(5_000, false, false, |_| {});
    assert!(c.continue_scroll_to_item_if_need().is_empty());

    clock.advance(50);
    assert!(c.tick().range.is_none());
    assert!(c.inertial_scroll().is_scrolling());

    // Another momentum event pushes the deadline out.
    c.scroll_position_change(ScrollParams::new(140), false);
    clock.advance(60);
    assert!(c.tick().range.is_none());

    clock.advance(40);
    let out = c.tick();
    assert!(!c.inertial_scroll().is_scrolling());
    assert_eq!(out.range, Some(Range::new(4_990, 5_010)));

    render(&mut c);
    assert_eq!(done.try_take(), Some(Ok(Some(5_000))));
}

#[test]
fn shift_to_direction_on_edge_resolves_none() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let up = c.shift_to_direction(Direction::Up);
    assert_eq!(up.try_take(), Some(Ok(None)));
    assert!(c.is_range_on_edge(Direction::Up));
}

#[test]
fn shift_to_direction_runs_on_tick() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let down = c.shift_to_direction(Direction::Down);
    assert!(!down.is_resolved());

    let out = c.tick();
    assert_eq!(out.range, Some(Range::new(5, 25)));
    let res = down.try_take().unwrap().unwrap().unwrap();
    assert_eq!(res.range, Range::new(5, 25));
    assert!(res.range_changed);

    // A second shift is refused until the first one is rendered.
    let blocked = c.shift_to_direction(Direction::Down);
    assert_eq!(blocked.try_take(), Some(Ok(None)));
}

#[test]
fn shift_to_direction_without_virtualization_resolves_none() {
    let mut c = controller(options(20), 5);
    let done = c.shift_to_direction(Direction::Down);
    assert_eq!(done.try_take(), Some(Ok(None)));
}

#[test]
fn virtual_scroll_while_window_unrendered_is_deferred() {
    let mut c = controller(options(20), 10_000);

    let out = c.scroll_position_change(ScrollParams::new(4_000), true);
    assert!(out.range.is_none());

    let out = render(&mut c);
    assert_eq!(out.range, Some(Range::new(95, 115)));
    assert_eq!(window(&c), Some((95, 115)));
}

#[test]
fn window_is_not_written_during_render() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    c.set_rendering(true);
    c.collection_mut().unwrap().keys.splice(0..0, 20_000..20_005);
    let out = c.handle_add_items(0, 5, Some(Direction::Up));
    assert!(out.range.is_none());
    assert_eq!(window(&c), Some((0, 20)));

    c.set_rendering(false);
    let out = c.complete_virtual_scroll_if_need();
    assert_eq!(out.range, Some(Range::new(5, 25)));
    assert_eq!(out.placeholders.unwrap().top, 5 * 40);
    assert_eq!(window(&c), Some((5, 25)));
}

#[test]
fn crossing_threshold_initializes_virtual_scroll() {
    let opts = ControllerOptions::new(
        VirtualScrollConfig::new(20)
            .with_viewport_height(400)
            .with_threshold(30),
    );
    let mut c = controller(opts, 25);
    assert!(c.virtual_scroll().is_none());

    c.collection_mut().unwrap().keys.extend(100..110);
    let out = c.handle_add_items(25, 10, None);
    assert!(c.virtual_scroll().is_some());
    assert_eq!(out.range, Some(Range::new(0, 20)));
    assert_eq!(window(&c), Some((0, 20)));
}

#[test]
fn force_virtual_scroll_ignores_threshold() {
    let c = controller(options(20).with_force_virtual_scroll(true), 5);
    assert!(c.virtual_scroll().is_some());
    assert_eq!(window(&c), Some((0, 5)));
}

#[test]
fn remove_items_refills_window() {
    let mut c = controller(options(20), 1_000);
    render(&mut c);
    c.scroll_position_change(ScrollParams::new(4_000), true);
    render(&mut c);
    assert_eq!(window(&c), Some((95, 115)));

    c.collection_mut().unwrap().keys.drain(90..140);
    let out = c.handle_remove_items(90, 50);
    assert_eq!(out.range, Some(Range::new(90, 110)));
    assert_eq!(window(&c), Some((90, 110)));
}

#[test]
fn move_items_keeps_window_size() {
    let mut c = controller(options(20), 1_000);
    render(&mut c);

    let out = c.handle_move_items(500, 3, 5, 3);
    let range = out.range.unwrap();
    assert_eq!(range.len(), 20);
    assert_eq!(c.virtual_scroll().unwrap().item_count(), 1_000);
}

#[test]
fn reset_items_reanchors_on_active_element() {
    let mut c = controller(options(20).with_notify_keys_rendered(true), 1_000);
    render(&mut c);
    c.scroll_position_change(ScrollParams::new(4_000), false);
    assert_eq!(c.active_element_index(), Some(100));

    let out = c.handle_reset_items();
    assert_eq!(out.range, Some(Range::new(90, 110)));
    assert_eq!(out.added_keys.len(), 20);
}

#[test]
fn data_driven_heights_feed_placeholders() {
    let mut collection = MockCollection::new(100);
    collection.heights = Some((0..100).map(|i| if i % 2 == 0 { 10 } else { 30 }).collect());
    let opts = ControllerOptions::new(
        VirtualScrollConfig::new(10)
            .with_viewport_height(100)
            .with_item_height_property("height"),
    );
    let mut c = ScrollController::new(opts, ManualClock::new(0));
    let out = c.update(UpdateParams {
        collection: Some(collection),
        ..UpdateParams::default()
    });
    // 50 items of 10px and 50 of 30px; the first ten take 200px.
    assert_eq!(out.placeholders.unwrap().bottom, 2_000 - 200);

    let heights = &mut c.collection_mut().unwrap().heights;
    if let Some(h) = heights.as_mut() {
        h.iter_mut().for_each(|h| *h = 20);
    }
    let out = c.update_items_heights();
    assert_eq!(out.placeholders.unwrap().bottom, 90 * 20);
}

#[test]
fn rendered_heights_update_placeholders() {
    let mut c = controller(options(10), 100);
    render(&mut c);
    let out = c.update_rendered_heights(&[20; 10]);
    let v = c.virtual_scroll().unwrap();
    assert_eq!(v.estimated_item_height(), 20);
    assert_eq!(out.placeholders.unwrap().bottom, 90 * 20);
}

#[test]
fn rendered_keys_are_reported_once() {
    let opts = options(20).with_notify_keys_rendered(true);
    let mut c = ScrollController::new(opts, ManualClock::new(0));
    let out = c.update(UpdateParams {
        collection: Some(MockCollection::new(10_000)),
        ..UpdateParams::default()
    });
    assert_eq!(out.added_keys, (0..20).collect::<Vec<u64>>());
    render(&mut c);

    let out = c.scroll_position_change(ScrollParams::new(4_000), true);
    assert_eq!(out.added_keys, (95..115).collect::<Vec<u64>>());
    assert!(c.is_key_rendered(&0));

    let out = c.set_indices_after_collection_change();
    assert!(out.added_keys.is_empty());
    assert_eq!(out.range, Some(Range::new(95, 115)));
}

#[test]
fn shadow_visibility_tracks_scroll_and_window() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);
    assert_eq!(
        c.shadow_visibility(),
        ShadowVisibility {
            up: false,
            down: true
        }
    );

    let mut small = controller(options(20), 5);
    small.update(UpdateParams {
        container: ContainerHeightsUpdate {
            scroll: Some(1_000),
            ..ContainerHeightsUpdate::default()
        },
        ..UpdateParams::default()
    });
    let out = small.scroll_position_change(ScrollParams::new(600), false);
    assert_eq!(
        out.shadow_visibility,
        Some(ShadowVisibility {
            up: true,
            down: false
        })
    );
}

#[test]
fn changing_config_reinitializes_and_rebinds_mode() {
    let mut c = controller(options(20), 1_000);
    assert_eq!(c.windowed_collection().unwrap().mode(), WindowMode::Remove);

    let out = c.update(UpdateParams {
        options: Some(ControllerOptions::new(
            VirtualScrollConfig::new(50)
                .with_viewport_height(400)
                .with_mode(WindowMode::Hide),
        )),
        ..UpdateParams::default()
    });
    assert_eq!(out.range, Some(Range::new(0, 50)));
    assert_eq!(c.windowed_collection().unwrap().mode(), WindowMode::Hide);

    // Disabling virtualization restores the full range.
    c.update(UpdateParams {
        options: Some(ControllerOptions::default()),
        ..UpdateParams::default()
    });
    assert!(c.virtual_scroll().is_none());
    assert_eq!(window(&c), None);
}

#[test]
fn destroy_rejects_pending_and_restores_full_range() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let pending = c.scroll_to_item(5_000, false, false, |_| {});
    let shift = c.shift_to_direction(Direction::Down);
    c.destroy();

    assert_eq!(pending.try_take(), Some(Err(ScrollError::Destroyed)));
    assert_eq!(shift.try_take(), Some(Err(ScrollError::Destroyed)));
    assert_eq!(window(&c), None);
    assert!(c.virtual_scroll().is_none());
    assert!(!c.has_pending_operations());

    let collection = c.detach_collection().unwrap();
    assert_eq!(collection.count(), 10_000);
}

#[test]
fn edge_item_keeps_position_across_prepend() {
    let mut c = controller(options(20), 100);
    let mut dims = MockDimensions::new(100..120, 40.0);
    dims.scroll_top = 130.0;

    let saved = c.save_edge_item(Direction::Up, &dims, &(), ".item").unwrap();
    assert_eq!(saved.key, 103);
    assert_eq!(saved.border, Border::Top);
    let saved_distance = saved.border_distance;
    assert!((saved_distance + 10.0).abs() < 1e-9);

    dims.prepend(0..5);
    let scroll_top = c
        .get_scroll_top_to_edge_item(Direction::Up, &dims, &(), ".item")
        .unwrap();
    assert_eq!(scroll_top, 330);
    assert!(c.edge_item().is_none());

    // Re-applying the restored offset puts the item back where it was.
    dims.scroll_top = scroll_top as f64;
    let again = capture_edge_item(Direction::Up, &dims, &(), ".item", 1.0).unwrap();
    assert_eq!(again.key, 103);
    assert!((again.border_distance - saved_distance).abs() <= 1.0);
}

#[test]
fn edge_item_at_bottom_skips_sticky_and_respects_tolerance() {
    let mut dims = MockDimensions::new(0..20, 40.0);
    dims.scroll_top = 0.5;
    // Item 9 ends at 399.5, within a pixel of the bottom border; item 10 starts at 399.5.
    let edge = capture_edge_item(Direction::Down, &dims, &(), ".item", 1.0).unwrap();
    assert_eq!(edge.key, 9);
    assert_eq!(edge.border, Border::Bottom);

    dims.items[9].2 = ItemKind::Sticky;
    let edge = capture_edge_item(Direction::Down, &dims, &(), ".item", 1.0).unwrap();
    assert_eq!(edge.key, 8);

    dims.sticky_top = 50.0;
    let edge = capture_edge_item(Direction::Up, &dims, &(), ".item", 1.0).unwrap();
    assert_eq!(edge.key, 1);
}

#[test]
fn edge_item_direction_mismatch_keeps_saved_params() {
    let mut c = controller(options(20), 100);
    let dims = MockDimensions::new(0..20, 40.0);
    c.save_edge_item(Direction::Up, &dims, &(), ".item");

    assert_eq!(
        c.get_scroll_top_to_edge_item(Direction::Down, &dims, &(), ".item"),
        None
    );
    assert!(c.edge_item().is_some());
}

#[test]
fn edge_item_with_nothing_rendered_is_none() {
    let dims = MockDimensions::new(core::iter::empty::<u64>(), 40.0);
    assert!(capture_edge_item(Direction::Up, &dims, &(), ".item", 1.0).is_none());
}

#[test]
fn windowed_collection_clamps_overshooting_window() {
    let mut w = WindowedCollection::new(MockCollection::new(10), WindowMode::Remove);
    assert_eq!(w.apply(Range::new(5, 30)), Range::new(5, 10));
    assert_eq!(w.get().window, Some((5, 10)));
    w.detach();
    assert_eq!(w.window(), Range::new(0, 10));
}

#[test]
fn windowed_collection_mounts_per_mode() {
    let mut removed = WindowedCollection::new(MockCollection::new(5), WindowMode::Remove);
    removed.apply(Range::new(1, 3));
    let mut seen = Vec::new();
    removed.for_each_mounted(|i, hidden| seen.push((i, hidden)));
    assert_eq!(seen, [(1, false), (2, false)]);

    let mut hidden = WindowedCollection::new(MockCollection::new(5), WindowMode::Hide);
    hidden.apply(Range::new(1, 3));
    let mut seen = Vec::new();
    hidden.for_each_mounted(|i, hidden| seen.push((i, hidden)));
    assert_eq!(
        seen,
        [(0, true), (1, false), (2, false), (3, true), (4, true)]
    );
}

#[test]
fn completion_can_be_awaited() {
    let mut done = pin!(Completion::ready(3usize));
    let mut cx = Context::from_waker(Waker::noop());
    assert_eq!(done.as_mut().poll(&mut cx), Poll::Ready(Ok(3)));
}

#[test]
fn dropped_operation_rejects_completion() {
    let (resolver, done) = crate::completion::completion::<()>();
    let mut fut = pin!(done);
    let mut cx = Context::from_waker(Waker::noop());
    assert_eq!(fut.as_mut().poll(&mut cx), Poll::Pending);
    drop(resolver);
    assert_eq!(
        fut.as_mut().poll(&mut cx),
        Poll::Ready(Err(ScrollError::Destroyed))
    );
}

#[derive(Debug)]
struct Op(Rc<RefCell<Vec<ScrollError>>>);

impl crate::pending::Cancel for Op {
    fn cancel(self, reason: ScrollError) {
        self.0.borrow_mut().push(reason);
    }
}

#[test]
fn pending_slot_cancels_previous_occupant() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = crate::pending::PendingSlot::default();
    assert!(!slot.supersede(Op(Rc::clone(&log))));
    assert!(slot.supersede(Op(Rc::clone(&log))));
    assert!(slot.cancel(ScrollError::Destroyed));
    assert!(!slot.is_pending());
    assert_eq!(
        *log.borrow(),
        [ScrollError::Superseded, ScrollError::Destroyed]
    );
}

#[test]
fn debounce_fires_once_after_last_touch() {
    let mut d = Debounce::new(100);
    assert!(!d.poll(1_000));
    d.touch(0);
    d.touch(80);
    assert!(!d.poll(150));
    assert!(d.poll(180));
    assert!(!d.poll(500));
    assert!(!d.is_pending());
}

#[test]
fn inertial_detector_is_idle_on_desktop() {
    let mut detector = InertialScrollDetector::new(&PlatformConfig::default());
    detector.scroll_event(0);
    assert!(!detector.is_scrolling());
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    detector.call_after_scroll_stopped(move || flag.set(true));
    assert!(ran.get());
}

#[test]
fn inertial_detector_runs_callbacks_when_scrolling_stops() {
    let mut detector = InertialScrollDetector::new(&PlatformConfig::touch());
    detector.scroll_event(0);
    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 0..3 {
        let order = Rc::clone(&order);
        detector.call_after_scroll_stopped(move || order.borrow_mut().push(n));
    }
    let stopped = detector.scroll_stopped();

    assert!(!detector.tick(99));
    assert!(order.borrow().is_empty());
    assert!(detector.tick(100));
    assert_eq!(*order.borrow(), [0, 1, 2]);
    assert_eq!(stopped.try_take(), Some(Ok(())));
    assert!(!detector.tick(200));
}

#[test]
fn inertial_detector_reset_drops_callbacks() {
    let mut detector = InertialScrollDetector::new(&PlatformConfig::touch());
    detector.scroll_event(0);
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    detector.call_after_scroll_stopped(move || flag.set(true));
    let stopped = detector.scroll_stopped();
    detector.reset();
    assert!(!detector.is_scrolling());
    assert!(!ran.get());
    assert_eq!(stopped.try_take(), Some(Ok(())));
}

#[test]
fn reapplying_same_window_after_render_keeps_completion_armed() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);

    let (seen, callback) = recorder();
    let done = c.scroll_to_item(5_000, false, false, callback);
    c.continue_scroll_to_item_if_need();

    c.set_rendering(true);
    c.set_rendering(false);
    let out = c.set_indices_after_collection_change();
    assert_eq!(out.range, Some(Range::new(4_990, 5_010)));
    c.update_rendered_heights(&[40; 20]);

    let out = c.complete_virtual_scroll_if_need();
    assert_eq!(out.scroll_top, Some(5_000 * 40));
    assert_eq!(seen.get(), Some(5_000));
    assert_eq!(done.try_take(), Some(Ok(Some(5_000))));
    assert!(!c.virtual_scroll().unwrap().range_changed());

    let down = c.shift_to_direction(Direction::Down);
    c.tick();
    let res = down.try_take().unwrap().unwrap().unwrap();
    assert_eq!(res.range, Range::new(4_995, 5_015));
}

#[test]
fn scroll_to_item_into_unrendered_window_waits_for_render() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);
    c.scroll_position_change(ScrollParams::new(4_000), true);
    assert!(c.virtual_scroll().unwrap().range_changed());

    let (seen, callback) = recorder();
    let done = c.scroll_to_item(105, false, false, callback);
    assert!(!done.is_resolved());

    // The reset lands on the same, still unrendered, window.
    let out = c.continue_scroll_to_item_if_need();
    assert_eq!(out.range, Some(Range::new(95, 115)));
    assert!(out.scroll_top.is_none());
    assert_eq!(seen.get(), None);
    assert!(!done.is_resolved());
    assert!(c.complete_virtual_scroll_if_need().scroll_top.is_none());

    let out = render(&mut c);
    assert_eq!(out.scroll_top, Some(105 * 40));
    assert_eq!(seen.get(), Some(105));
    assert_eq!(done.try_take(), Some(Ok(Some(105))));
}

#[test]
fn new_collection_anchors_at_the_top() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);
    c.scroll_position_change(ScrollParams::new(200_000), false);
    assert_eq!(c.active_element_index(), Some(5_000));

    let out = c.update(UpdateParams {
        collection: Some(MockCollection::new(10_000)),
        ..UpdateParams::default()
    });
    assert_eq!(out.range, Some(Range::new(0, 20)));
    assert_eq!(out.placeholders.unwrap().top, 0);
    assert_eq!(c.active_element_index(), None);
    assert_eq!(c.last_scroll_top(), 0);
}

#[test]
fn missing_echo_of_controller_scroll_does_not_swallow_user_scroll() {
    let mut c = controller(options(20), 10_000);
    render(&mut c);
    c.scroll_to_item(5_000, false, false, |_| {});
    let out = render(&mut c);
    assert_eq!(out.range, Some(Range::new(4_990, 5_010)));
    let out = render(&mut c);
    assert_eq!(out.scroll_top, Some(200_000));
    assert!(!c.is_real_scroll());

    // The host never reports 200_000; the user scrolls elsewhere.
    c.scroll_position_change(ScrollParams::new(100_000), false);
    let out = c.scroll_position_change(ScrollParams::new(100_000), true);
    assert!(c.is_real_scroll());
    assert_eq!(out.range, Some(Range::new(2_495, 2_515)));
}

#[test]
fn scroll_stopped_hooks_run_from_tick() {
    let clock = ManualClock::new(0);
    let opts = options(20).with_platform(PlatformConfig::touch());
    let mut c = ScrollController::new(opts, clock.clone());
    c.update(UpdateParams {
        collection: Some(MockCollection::new(1_000)),
        ..UpdateParams::default()
    });
    c.scroll_position_change(ScrollParams::new(40), false);

    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    c.call_after_scroll_stopped(move || flag.set(true));
    let stopped = c.scroll_stopped();
    assert!(!ran.get());
    assert!(!stopped.is_resolved());

    clock.advance(DEFAULT_INERTIAL_SCROLL_STOP_DELAY_MS);
    c.tick();
    assert!(ran.get());
    assert_eq!(stopped.try_take(), Some(Ok(())));
}
