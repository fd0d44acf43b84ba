use virtual_scroll_controller::virtual_scroll::VirtualScrollConfig;
use virtual_scroll_controller::{
    ControllerOptions, ItemCollection, ManualClock, ScrollController, ScrollParams, UpdateParams,
};

/// A keyed list whose iteration honours the index window set by the controller.
struct Messages {
    ids: Vec<u64>,
    window: Option<(usize, usize)>,
}

impl ItemCollection for Messages {
    type Key = u64;

    fn count(&self) -> usize {
        self.ids.len()
    }

    fn key_at(&self, index: usize) -> Option<u64> {
        self.ids.get(index).copied()
    }

    fn index_by_key(&self, key: &u64) -> Option<usize> {
        self.ids.binary_search(key).ok()
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
        self.window.map_or(self.ids.len(), |w| w.1)
    }
}

fn main() {
    // Example: jump to a message far outside the rendered window.
    //
    // The host loop is typically:
    // 1) call `scroll_to_item`; if the item is not reachable the request is queued
    // 2) after each render: `continue_scroll_to_item_if_need`, then
    //    `complete_virtual_scroll_if_need`
    // 3) apply every returned patch (window, placeholders, scroll offset)
    let options = ControllerOptions::new(VirtualScrollConfig::new(30).with_viewport_height(600));
    let mut c = ScrollController::new(options, ManualClock::new(0));
    let out = c.update(UpdateParams {
        collection: Some(Messages {
            ids: (0..50_000).map(|i| 1_000 + i * 2).collect(),
            window: None,
        }),
        ..UpdateParams::default()
    });
    println!("initial: {:?} {:?}", out.range, out.placeholders);

    let render = |c: &mut ScrollController<Messages>| {
        c.set_rendering(true);
        // ... the UI renders `start_index..stop_index` here ...
        c.set_rendering(false);
    };
    render(&mut c);
    c.complete_virtual_scroll_if_need();

    let done = c.scroll_to_item(61_000, false, false, |index| {
        println!("item reached at index {index}");
    });

    let out = c.continue_scroll_to_item_if_need();
    println!("window reset: {:?} {:?}", out.range, out.placeholders);

    render(&mut c);
    let out = c.complete_virtual_scroll_if_need();
    if let Some(scroll_top) = out.scroll_top {
        c.scroll_position_change(ScrollParams::new(scroll_top), false);
        println!("real scroll: {}", c.is_real_scroll());
        c.scroll_position_change(ScrollParams::new(scroll_top), true);
    }
    println!("result: {:?}", done.try_take());
}
