/// A half-open `[start, stop)` window into the item collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: usize,
    pub stop: usize, // exclusive
}

impl Range {
    pub const EMPTY: Range = Range { start: 0, stop: 0 };

    pub fn new(start: usize, stop: usize) -> Self {
        Self {
            start,
            stop: stop.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.stop
    }

    /// Clamps the window so that `0 <= start <= stop <= count`.
    pub fn clamped(self, count: usize) -> Self {
        let stop = self.stop.min(count);
        Self {
            start: self.start.min(stop),
            stop,
        }
    }
}

/// Pixel heights standing in for the items above and below the rendered [`Range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholders {
    pub top: u64,
    pub bottom: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Visibility of the "load more" sentinels at the window edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerState {
    pub up: bool,
    pub down: bool,
}

impl TriggerState {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn set(&mut self, direction: Direction, visible: bool) {
        match direction {
            Direction::Up => self.up = visible,
            Direction::Down => self.down = visible,
        }
    }
}

/// Pixel measurements of the scrollable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerHeightsData {
    pub viewport: u32,
    pub scroll: u64,
    pub top_trigger: u32,
    pub bottom_trigger: u32,
}

/// A partial update for [`ContainerHeightsData`]; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerHeightsUpdate {
    pub viewport: Option<u32>,
    pub scroll: Option<u64>,
    pub top_trigger: Option<u32>,
    pub bottom_trigger: Option<u32>,
}

impl ContainerHeightsUpdate {
    pub fn is_empty(&self) -> bool {
        self.viewport.is_none()
            && self.scroll.is_none()
            && self.top_trigger.is_none()
            && self.bottom_trigger.is_none()
    }
}

impl ContainerHeightsData {
    pub fn merge(&mut self, update: ContainerHeightsUpdate) {
        if let Some(viewport) = update.viewport {
            self.viewport = viewport;
        }
        if let Some(scroll) = update.scroll {
            self.scroll = scroll;
        }
        if let Some(top_trigger) = update.top_trigger {
            self.top_trigger = top_trigger;
        }
        if let Some(bottom_trigger) = update.bottom_trigger {
            self.bottom_trigger = bottom_trigger;
        }
    }
}

/// The outcome of a window computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftResult {
    pub range: Range,
    pub placeholders: Placeholders,
    /// Whether this computation moved the window.
    pub range_changed: bool,
}
