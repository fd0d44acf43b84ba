use virtual_scroll_controller::virtual_scroll::Direction;
use virtual_scroll_controller::{
    Border, DimensionProvider, ElementRect, ItemBox, ItemKind, capture_edge_item,
    scroll_top_to_edge_item,
};

/// Rows of equal height laid out from the top of the content.
struct Rows {
    keys: Vec<u64>,
    row_height: f64,
    scroll_top: f64,
}

impl DimensionProvider<u64> for Rows {
    type Container = ();

    fn viewport_rect(&self) -> ElementRect {
        ElementRect::new(0.0, 300.0)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn for_each_item(&self, _: &(), _: &str, f: &mut dyn FnMut(ItemBox<u64>)) {
        for (i, &key) in self.keys.iter().enumerate() {
            let top = i as f64 * self.row_height - self.scroll_top;
            f(ItemBox {
                key,
                rect: ElementRect::new(top, self.row_height),
                kind: ItemKind::Regular,
            });
        }
    }

    fn sticky_headers_height(&self, border: Border) -> f64 {
        // A 24px sticky header pinned at the top.
        match border {
            Border::Top => 24.0,
            Border::Bottom => 0.0,
        }
    }
}

fn main() {
    // Example: preserve the visual position across a "prepend" (chat/timeline loads older
    // messages).
    //
    // 1) capture the edge item before the render tree changes
    // 2) apply the data change and re-render
    // 3) compute the scroll offset that puts the same item back at the same place
    let mut rows = Rows {
        keys: (1_000..1_100).collect(),
        row_height: 30.0,
        scroll_top: 95.0,
    };

    let Some(edge) = capture_edge_item(Direction::Up, &rows, &(), ".row", 1.0) else {
        return;
    };
    println!("before prepend: off={} edge={edge:?}", rows.scroll_top);

    rows.keys.splice(0..0, 2_000..2_010);

    if let Some(scroll_top) = scroll_top_to_edge_item(&edge, &rows, &(), ".row") {
        rows.scroll_top = scroll_top as f64;
    }
    println!("after prepend: off={}", rows.scroll_top);
}
