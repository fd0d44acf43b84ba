use virtual_scroll::VirtualScrollConfig;

/// Debounce after the last momentum scroll event before scrolling counts as stopped.
pub const DEFAULT_INERTIAL_SCROLL_STOP_DELAY_MS: u64 = 100;

/// Sub-pixel slack when comparing item edges with viewport boundaries.
pub const DEFAULT_EDGE_TOLERANCE_PX: f64 = 1.0;

/// Platform-specific tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatformConfig {
    /// Whether the platform produces momentum ("inertial") scrolling.
    pub touch: bool,
    pub inertial_scroll_stop_delay_ms: u64,
    pub edge_tolerance_px: f64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            touch: false,
            inertial_scroll_stop_delay_ms: DEFAULT_INERTIAL_SCROLL_STOP_DELAY_MS,
            edge_tolerance_px: DEFAULT_EDGE_TOLERANCE_PX,
        }
    }
}

impl PlatformConfig {
    pub fn touch() -> Self {
        Self {
            touch: true,
            ..Self::default()
        }
    }
}

/// Configuration for [`crate::ScrollController`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerOptions {
    /// `None` disables virtualization; the whole collection is rendered.
    pub virtual_scroll_config: Option<VirtualScrollConfig>,
    /// Virtualize even when the collection is below the configured threshold.
    pub force_virtual_scroll: bool,
    /// Report newly rendered keys in every output patch.
    pub notify_keys_rendered: bool,
    pub platform: PlatformConfig,
}

impl ControllerOptions {
    pub fn new(virtual_scroll_config: VirtualScrollConfig) -> Self {
        Self {
            virtual_scroll_config: Some(virtual_scroll_config),
            ..Self::default()
        }
    }

    pub fn with_force_virtual_scroll(mut self, force: bool) -> Self {
        self.force_virtual_scroll = force;
        self
    }

    pub fn with_notify_keys_rendered(mut self, notify: bool) -> Self {
        self.notify_keys_rendered = notify;
        self
    }

    pub fn with_platform(mut self, platform: PlatformConfig) -> Self {
        self.platform = platform;
        self
    }

    pub(crate) fn should_virtualize(&self, item_count: usize) -> bool {
        match &self.virtual_scroll_config {
            Some(config) => self.force_virtual_scroll || item_count > config.threshold(),
            None => false,
        }
    }
}
