//! Controller utilities for the `virtual-scroll` crate.
//!
//! The `virtual-scroll` crate computes windows and placeholders. This crate binds that engine
//! to an item collection and a render cycle, and provides the helpers an adapter needs around
//! it:
//!
//! - [`ScrollController`]: scroll events, scroll-to-item, paging, collection mutations
//! - [`InertialScrollDetector`]: defers work while momentum scrolling is in progress
//! - Scroll anchoring across destructive re-renders ([`capture_edge_item`])
//!
//! Time comes from an injected [`Clock`] and deferred results are delivered through
//! [`Completion`] handles, so the crate does not depend on any executor or UI framework.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod clock;
mod collection;
mod completion;
mod controller;
mod dimensions;
mod error;
mod inertial;
mod key;
mod options;
mod output;
mod pending;

#[cfg(test)]
mod tests;

pub use anchor::{EdgeItemParams, capture_edge_item, scroll_top_to_edge_item};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, Debounce, ManualClock};
pub use collection::{ItemCollection, WindowedCollection};
pub use completion::Completion;
pub use controller::{ScrollController, ScrollParams, UpdateParams};
pub use dimensions::{Border, DimensionProvider, ElementRect, ItemBox, ItemKind};
pub use error::ScrollError;
pub use inertial::InertialScrollDetector;
pub use key::ScrollKey;
pub use options::{
    ControllerOptions, DEFAULT_EDGE_TOLERANCE_PX, DEFAULT_INERTIAL_SCROLL_STOP_DELAY_MS,
    PlatformConfig,
};
pub use output::{ControllerOutput, ShadowVisibility};

pub use virtual_scroll;
