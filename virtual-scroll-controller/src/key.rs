#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::HashSet;

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Stable item identity used by the controller (rendered-key tracking, anchoring).
#[cfg(feature = "std")]
pub trait ScrollKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq + Clone> ScrollKey for T {}

#[cfg(not(feature = "std"))]
pub trait ScrollKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<T: Ord + Clone> ScrollKey for T {}
