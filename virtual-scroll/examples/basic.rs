use virtual_scroll::{ContainerHeightsUpdate, VirtualScroll, VirtualScrollConfig};

fn main() {
    let mut v = VirtualScroll::new(VirtualScrollConfig::new(20).with_viewport_height(400));
    let res = v.reset_range(0, 10_000, None);
    println!("initial: {:?} {:?}", res.range, res.placeholders);

    // Simulate a frame: the UI measured the rendered rows and scrolled.
    v.update_rendered_heights(&[32; 20]);
    v.apply_container_heights_data(ContainerHeightsUpdate {
        scroll: Some(v.total_height()),
        ..Default::default()
    });
    v.set_range_applied();

    let res = v.shift_range_to_scroll_position(64_000);
    println!("scrolled: {:?} {:?}", res.range, res.placeholders);
    if let Some(active) = v.get_active_element_index(64_000) {
        println!("active item: {active}");
    }
}
