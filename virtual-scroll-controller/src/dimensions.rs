use virtual_scroll::Direction;

/// A vertical bounding box in viewport coordinates (pixels, may be fractional).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub bottom: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// A viewport boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Border {
    Top,
    Bottom,
}

impl From<Direction> for Border {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Top,
            Direction::Down => Self::Bottom,
        }
    }
}

/// What a rendered element is, as far as scroll anchoring cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemKind {
    #[default]
    Regular,
    /// Fixed by the sticky-header subsystem; its box does not move with the content.
    Sticky,
    /// Inside a hidden container.
    Hidden,
    /// A transient footer of an expanded tree node.
    NodeFooter,
}

impl ItemKind {
    pub fn is_anchor_candidate(self) -> bool {
        self == Self::Regular
    }
}

/// A rendered item element.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemBox<K> {
    pub key: K,
    pub rect: ElementRect,
    pub kind: ItemKind,
}

/// Read-only measurements of the rendering surface.
///
/// Implementations return neutral values (zero-sized boxes, no items) for detached elements
/// instead of failing.
pub trait DimensionProvider<K> {
    type Container: ?Sized;

    /// Bounding box of the scrollable viewport.
    fn viewport_rect(&self) -> ElementRect;

    /// Current scroll offset of the viewport.
    fn scroll_top(&self) -> f64;

    /// Visits the rendered items of `container` matching `selector`, in document order.
    fn for_each_item(
        &self,
        container: &Self::Container,
        selector: &str,
        f: &mut dyn FnMut(ItemBox<K>),
    );

    /// Height of the sticky headers stacked at `border`.
    fn sticky_headers_height(&self, border: Border) -> f64 {
        let _ = border;
        0.0
    }
}
