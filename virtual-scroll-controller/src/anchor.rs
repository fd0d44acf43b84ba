use alloc::vec::Vec;
use core::fmt;

use virtual_scroll::Direction;

use crate::{Border, DimensionProvider, ElementRect, ItemBox};

/// The item sitting at a viewport boundary right before a destructive re-render.
///
/// Typical use cases:
/// - prepending/appending a page of items without content jumping
/// - rebuilding the rendered window after a reset while keeping the same item in view
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeItemParams<K> {
    pub key: K,
    pub border: Border,
    /// Signed distance from the border to the item's edge on the same side.
    pub border_distance: f64,
}

impl<K: fmt::Debug> fmt::Debug for EdgeItemParams<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeItemParams")
            .field("key", &self.key)
            .field("border", &self.border)
            .field("border_distance", &self.border_distance)
            .finish()
    }
}

fn border_offset<K, D: DimensionProvider<K> + ?Sized>(provider: &D, border: Border) -> f64 {
    let viewport = provider.viewport_rect();
    let sticky = provider.sticky_headers_height(border);
    match border {
        Border::Top => viewport.top + sticky,
        Border::Bottom => viewport.bottom - sticky,
    }
}

fn edge_of(rect: &ElementRect, border: Border) -> f64 {
    match border {
        Border::Top => rect.top,
        Border::Bottom => rect.bottom,
    }
}

/// Finds the edge item for `direction`.
///
/// Rendered items are scanned from the scroll edge inward (top-down for `Up`, bottom-up for
/// `Down`), skipping sticky, hidden and node-footer elements. The first item whose trailing
/// edge passes the boundary wins; if none does, the last candidate scanned is used.
///
/// Returns `None` if nothing anchorable is rendered.
pub fn capture_edge_item<K, D: DimensionProvider<K> + ?Sized>(
    direction: Direction,
    provider: &D,
    container: &D::Container,
    selector: &str,
    tolerance_px: f64,
) -> Option<EdgeItemParams<K>> {
    let border = Border::from(direction);
    let boundary = border_offset::<K, D>(provider, border);

    let mut items: Vec<ItemBox<K>> = Vec::new();
    provider.for_each_item(container, selector, &mut |item| {
        if item.kind.is_anchor_candidate() {
            items.push(item);
        }
    });
    if direction == Direction::Down {
        items.reverse();
    }

    let passes = |item: &ItemBox<K>| match border {
        Border::Top => item.rect.bottom > boundary + tolerance_px,
        Border::Bottom => item.rect.top < boundary - tolerance_px,
    };
    let index = items
        .iter()
        .position(passes)
        .unwrap_or(items.len().checked_sub(1)?);
    let item = items.swap_remove(index);

    let border_distance = edge_of(&item.rect, border) - boundary;
    vtrace!(border_distance, ?border, "captured edge item");
    Some(EdgeItemParams {
        key: item.key,
        border,
        border_distance,
    })
}

/// Computes the scroll offset that puts the saved edge item back at its saved distance from
/// the border.
///
/// Returns `None` if the item is no longer rendered.
pub fn scroll_top_to_edge_item<K: PartialEq, D: DimensionProvider<K> + ?Sized>(
    params: &EdgeItemParams<K>,
    provider: &D,
    container: &D::Container,
    selector: &str,
) -> Option<u64> {
    let mut found = None;
    provider.for_each_item(container, selector, &mut |item| {
        if found.is_none() && item.key == params.key {
            found = Some(item.rect);
        }
    });
    let rect = found?;
    let boundary = border_offset::<K, D>(provider, params.border);
    let drift = edge_of(&rect, params.border) - boundary - params.border_distance;
    Some(round_px(provider.scroll_top() + drift))
}

/// Rounds to an integer pixel, clamping at zero.
pub(crate) fn round_px(value: f64) -> u64 {
    if value <= 0.0 {
        return 0;
    }
    (value + 0.5) as u64
}
