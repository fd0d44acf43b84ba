use alloc::string::String;

/// Fallback height used before any item height is known.
pub const DEFAULT_ESTIMATED_ITEM_HEIGHT: u32 = 40;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// How out-of-window items are treated by the render tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowMode {
    /// Items outside the window are not mounted at all.
    #[default]
    Remove,
    /// Items outside the window stay mounted but hidden.
    Hide,
}

/// Configuration for [`crate::VirtualScroll`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualScrollConfig {
    pub mode: WindowMode,
    pub page_size: usize,
    /// Items moved by a single `shift_range`. Defaults to a quarter of `page_size`.
    pub segment_size: Option<usize>,
    /// Name of the item property holding a data-driven height.
    pub item_height_property: Option<String>,
    /// Initial viewport height, used until the container is measured.
    pub viewport_height: Option<u32>,
    pub top_trigger_offset: u32,
    pub bottom_trigger_offset: u32,
    pub estimated_item_height: u32,
    /// Item count above which virtualization kicks in. Defaults to `page_size`.
    pub threshold: Option<usize>,
}

impl Default for VirtualScrollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl VirtualScrollConfig {
    pub fn new(page_size: usize) -> Self {
        Self {
            mode: WindowMode::Remove,
            page_size: page_size.max(1),
            segment_size: None,
            item_height_property: None,
            viewport_height: None,
            top_trigger_offset: 0,
            bottom_trigger_offset: 0,
            estimated_item_height: DEFAULT_ESTIMATED_ITEM_HEIGHT,
            threshold: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
            .unwrap_or_else(|| self.page_size().div_ceil(4))
            .max(1)
    }

    pub fn threshold(&self) -> usize {
        self.threshold.unwrap_or_else(|| self.page_size())
    }

    pub fn with_mode(mut self, mode: WindowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = Some(segment_size);
        self
    }

    pub fn with_item_height_property(mut self, property: impl Into<String>) -> Self {
        self.item_height_property = Some(property.into());
        self
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = Some(viewport_height);
        self
    }

    pub fn with_trigger_offsets(mut self, top: u32, bottom: u32) -> Self {
        self.top_trigger_offset = top;
        self.bottom_trigger_offset = bottom;
        self
    }

    pub fn with_estimated_item_height(mut self, height: u32) -> Self {
        self.estimated_item_height = height;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
