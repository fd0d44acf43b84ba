use alloc::vec::Vec;

use virtual_scroll::{Placeholders, Range};

/// Whether content exists beyond each viewport edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowVisibility {
    pub up: bool,
    pub down: bool,
}

/// A patch for the host to apply after a controller call.
///
/// `range` and `placeholders` are always produced together.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerOutput<K> {
    /// The index window written to the collection.
    pub range: Option<Range>,
    pub placeholders: Option<Placeholders>,
    /// Keys rendered for the first time (only with `notify_keys_rendered`).
    pub added_keys: Vec<K>,
    pub shadow_visibility: Option<ShadowVisibility>,
    /// A scroll offset the host must apply to its viewport.
    pub scroll_top: Option<u64>,
}

impl<K> Default for ControllerOutput<K> {
    fn default() -> Self {
        Self {
            range: None,
            placeholders: None,
            added_keys: Vec::new(),
            shadow_visibility: None,
            scroll_top: None,
        }
    }
}

impl<K> ControllerOutput<K> {
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
            && self.placeholders.is_none()
            && self.added_keys.is_empty()
            && self.shadow_visibility.is_none()
            && self.scroll_top.is_none()
    }
}
