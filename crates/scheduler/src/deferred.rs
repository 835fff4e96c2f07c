//! Deferred handle: a pending result with external resolve/reject
//!
//! A [`Deferred`] splits into a [`Promise`] that can be awaited and a
//! [`Resolver`] that settles it. The first settlement wins; later calls to
//! `resolve` or `reject` are ignored.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Returned by a [`Promise`] whose resolvers were all dropped unsettled
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deferred dropped before it was settled")]
pub struct Abandoned;

/// A pending result paired with the means to settle it
pub struct Deferred<T, E> {
    pub promise: Promise<T, E>,
    pub resolver: Resolver<T, E>,
}

impl<T, E> Deferred<T, E> {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            promise: Promise { rx },
            resolver: Resolver {
                sender: Rc::new(RefCell::new(Some(tx))),
            },
        }
    }
}

impl<T, E> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("settled", &self.resolver.is_settled())
            .finish_non_exhaustive()
    }
}

/// Settling half of a [`Deferred`]
///
/// Clones share the same settlement slot.
pub struct Resolver<T, E> {
    sender: Rc<RefCell<Option<oneshot::Sender<Result<T, E>>>>>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            sender: Rc::clone(&self.sender),
        }
    }
}

impl<T, E> Resolver<T, E> {
    /// Fulfil the promise. Returns `false` if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Reject the promise. Returns `false` if it was already settled.
    pub fn reject(&self, error: E) -> bool {
        self.settle(Err(error))
    }

    pub fn settle(&self, result: Result<T, E>) -> bool {
        let Some(tx) = self.sender.borrow_mut().take() else {
            return false;
        };
        // The promise may have been dropped already; the settlement still counts.
        let _ = tx.send(result);
        true
    }

    pub fn is_settled(&self) -> bool {
        self.sender.borrow().is_none()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Awaitable half of a [`Deferred`]
#[must_use = "a promise does nothing unless awaited"]
pub struct Promise<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Unpin for Promise<T, E> {}

impl<T, E> Future for Promise<T, E>
where
    E: From<Abandoned>,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(E::from(Abandoned))))
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").finish_non_exhaustive()
    }
}
