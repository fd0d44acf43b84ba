use virtual_scroll::{Direction, TriggerState, VirtualScroll, VirtualScrollConfig};

fn main() {
    let mut v = VirtualScroll::new(VirtualScrollConfig::new(20).with_segment_size(10));
    v.reset_range(0, 50, None);

    // The bottom trigger became visible: page in the next segment until the edge.
    while !v.is_range_on_edge(Direction::Down) {
        let res = v.shift_range(Direction::Down);
        println!("shifted down: {:?}", res.range);
        v.set_range_applied();
    }

    // A "load more" response appended 25 items while the bottom trigger is still visible.
    let triggers = TriggerState {
        up: false,
        down: true,
    };
    let res = v.add_items(50, 25, triggers, None);
    println!("after append: {:?} {:?}", res.range, res.placeholders);

    let res = v.remove_items(0, 40);
    println!("after removal: {:?} {:?}", res.range, res.placeholders);
}
