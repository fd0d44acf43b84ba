use crate::ScrollError;

/// An operation that can be rejected when it leaves a [`PendingSlot`] without running.
pub(crate) trait Cancel {
    fn cancel(self, reason: ScrollError);
}

/// Holds at most one pending operation.
///
/// Replacing the occupant cancels it explicitly instead of silently dropping it.
#[derive(Debug)]
pub(crate) struct PendingSlot<T> {
    slot: Option<T>,
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Cancel> PendingSlot<T> {
    pub(crate) fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Stores `next`, cancelling the previous occupant with [`ScrollError::Superseded`].
    ///
    /// Returns `true` if an occupant was superseded.
    pub(crate) fn supersede(&mut self, next: T) -> bool {
        let superseded = self.cancel(ScrollError::Superseded);
        self.slot = Some(next);
        superseded
    }

    /// Puts an operation back without cancelling anything (the slot must be empty).
    pub(crate) fn restore(&mut self, op: T) {
        debug_assert!(self.slot.is_none(), "PendingSlot::restore on an occupied slot");
        self.slot = Some(op);
    }

    /// Cancels the occupant, if any. Returns `true` if something was cancelled.
    pub(crate) fn cancel(&mut self, reason: ScrollError) -> bool {
        match self.slot.take() {
            Some(prev) => {
                prev.cancel(reason);
                true
            }
            None => false,
        }
    }
}
