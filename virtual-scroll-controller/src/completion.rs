use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use crate::ScrollError;

struct Shared<T> {
    result: Option<Result<T, ScrollError>>,
    waker: Option<Waker>,
}

/// The deferred result of a controller operation.
///
/// Resolved from a later call into the controller (`tick`, `continue_scroll_to_item_if_need`,
/// `complete_virtual_scroll_if_need`). It can be awaited, or polled with [`Self::try_take`].
pub struct Completion<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// The write side of a [`Completion`].
///
/// Dropping an unresolved resolver rejects the completion with [`ScrollError::Destroyed`], so
/// a completion never stays pending after its operation is gone.
pub(crate) struct Resolver<T> {
    shared: Option<Rc<RefCell<Shared<T>>>>,
}

pub(crate) fn completion<T>() -> (Resolver<T>, Completion<T>) {
    let shared = Rc::new(RefCell::new(Shared {
        result: None,
        waker: None,
    }));
    (
        Resolver {
            shared: Some(Rc::clone(&shared)),
        },
        Completion { shared },
    )
}

impl<T> Completion<T> {
    /// A completion that is already resolved with `value`.
    pub fn ready(value: T) -> Self {
        let (resolver, completion) = completion();
        resolver.resolve(Ok(value));
        completion
    }

    pub fn is_resolved(&self) -> bool {
        self.shared.borrow().result.is_some()
    }

    /// Takes the result if the operation finished.
    pub fn try_take(&self) -> Option<Result<T, ScrollError>> {
        self.shared.borrow_mut().result.take()
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, ScrollError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.shared.borrow_mut();
        match shared.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<T> Resolver<T> {
    pub(crate) fn resolve(mut self, result: Result<T, ScrollError>) {
        if let Some(shared) = self.shared.take() {
            Self::settle(&shared, result);
        }
    }

    fn settle(shared: &Rc<RefCell<Shared<T>>>, result: Result<T, ScrollError>) {
        let waker = {
            let mut shared = shared.borrow_mut();
            shared.result = Some(result);
            shared.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> Drop for Resolver<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            Self::settle(&shared, Err(ScrollError::Destroyed));
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("pending", &self.shared.is_some())
            .finish()
    }
}
