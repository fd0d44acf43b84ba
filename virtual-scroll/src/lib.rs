//! A headless range/placeholder engine for virtual scrolling.
//!
//! For the controller that binds the engine to an item collection and a render cycle, see
//! the `virtual-scroll-controller` crate.
//!
//! This crate decides which contiguous slice of a large list must exist in the render tree
//! and how much empty space stands in for the items above and below it:
//! - prefix sums over known/estimated item heights
//! - scroll offset → window, trigger-driven paging, scroll-to-item feasibility
//! - window bookkeeping across insertions and removals
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport and trigger measurements
//! - scroll offset
//! - item heights (measured or data-driven)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod heights;
mod options;
mod types;
mod virtual_scroll;


pub use options::{
    DEFAULT_ESTIMATED_ITEM_HEIGHT, DEFAULT_PAGE_SIZE, VirtualScrollConfig, WindowMode,
};
pub use types::{
    ContainerHeightsData, ContainerHeightsUpdate, Direction, Placeholders, Range, ShiftResult,
    TriggerState,
};
pub use virtual_scroll::VirtualScroll;
