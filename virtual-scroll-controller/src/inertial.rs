use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::clock::Debounce;
use crate::completion::{Resolver, completion};
use crate::{Completion, PlatformConfig};

type StoppedCallback = Box<dyn FnOnce()>;

/// Tracks momentum scrolling on touch platforms.
///
/// Scrolling counts as stopped once no scroll event arrived for the configured delay; there
/// is no overall deadline. On non-touch platforms the detector is always idle.
///
/// `ScrollController` polls [`Self::is_scrolling`] to hold back its own work and exposes the
/// callback and completion hooks to the host.
pub struct InertialScrollDetector {
    touch: bool,
    stop_timer: Debounce,
    scrolling: bool,
    callbacks: Vec<StoppedCallback>,
    waiters: Vec<Resolver<()>>,
}

impl InertialScrollDetector {
    pub fn new(platform: &PlatformConfig) -> Self {
        Self {
            touch: platform.touch,
            stop_timer: Debounce::new(platform.inertial_scroll_stop_delay_ms),
            scrolling: false,
            callbacks: Vec::new(),
            waiters: Vec::new(),
        }
    }

    pub fn set_platform(&mut self, platform: &PlatformConfig) {
        self.touch = platform.touch;
        self.stop_timer
            .set_delay_ms(platform.inertial_scroll_stop_delay_ms);
        if !self.touch && self.scrolling {
            self.finish();
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Records a scroll event at `now_ms`.
    pub fn scroll_event(&mut self, now_ms: u64) {
        if !self.touch {
            return;
        }
        if !self.scrolling {
            vtrace!(now_ms, "inertial scrolling started");
        }
        self.scrolling = true;
        self.stop_timer.touch(now_ms);
    }

    /// Advances the stop timer. Returns `true` on the tick at which scrolling stopped.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.scrolling || !self.stop_timer.poll(now_ms) {
            return false;
        }
        vtrace!(now_ms, "inertial scrolling stopped");
        self.finish();
        true
    }

    /// Runs `callback` now if idle, otherwise once scrolling stops (in call order).
    pub fn call_after_scroll_stopped(&mut self, callback: impl FnOnce() + 'static) {
        if self.scrolling {
            self.callbacks.push(Box::new(callback));
        } else {
            callback();
        }
    }

    /// A completion resolved when scrolling stops.
    pub fn scroll_stopped(&mut self) -> Completion<()> {
        if !self.scrolling {
            return Completion::ready(());
        }
        let (resolver, completion) = completion();
        self.waiters.push(resolver);
        completion
    }

    /// Forgets the current gesture. Queued callbacks are dropped, waiters are resolved.
    pub fn reset(&mut self) {
        self.stop_timer.cancel();
        self.scrolling = false;
        self.callbacks.clear();
        for waiter in self.waiters.drain(..) {
            waiter.resolve(Ok(()));
        }
    }

    fn finish(&mut self) {
        self.scrolling = false;
        self.stop_timer.cancel();
        for callback in core::mem::take(&mut self.callbacks) {
            callback();
        }
        for waiter in self.waiters.drain(..) {
            waiter.resolve(Ok(()));
        }
    }
}

impl fmt::Debug for InertialScrollDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InertialScrollDetector")
            .field("touch", &self.touch)
            .field("scrolling", &self.scrolling)
            .field("stop_timer", &self.stop_timer)
            .field("queued_callbacks", &self.callbacks.len())
            .field("waiters", &self.waiters.len())
            .finish()
    }
}
