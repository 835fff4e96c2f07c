//! Debounced pass trigger
//!
//! A [`Pass`] runs its callback at most once per scheduling window. While a
//! window is armed, further `schedule` calls can only push the deadline
//! later; an earlier request never moves an armed deadline forward.
//!
//! The timer callback that fires early (because the deadline was extended)
//! re-arms itself for the remainder, so exactly one callback invocation
//! happens per window and no cancellation is needed.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::time::Instant;

use crate::timer::Timer;

struct PassInner {
    timer: Rc<dyn Timer>,
    callback: Box<dyn Fn()>,
    deadline: Cell<Option<Instant>>,
}

/// Coalescing callback trigger
pub struct Pass {
    inner: Rc<PassInner>,
}

impl Pass {
    pub fn new(timer: Rc<dyn Timer>, callback: impl Fn() + 'static) -> Self {
        Self {
            inner: Rc::new(PassInner {
                timer,
                callback: Box::new(callback),
                deadline: Cell::new(None),
            }),
        }
    }

    /// Request the callback to run after `delay`
    ///
    /// Returns `true` if a window was armed or its deadline extended, and
    /// `false` if the already armed deadline stands.
    pub fn schedule(&self, delay: Duration) -> bool {
        let deadline = self.inner.timer.now() + delay;
        match self.inner.deadline.get() {
            Some(armed) if deadline <= armed => false,
            Some(armed) => {
                let extended_by_us =
                    u64::try_from((deadline - armed).as_micros()).unwrap_or(u64::MAX);
                tracing::trace!(extended_by_us, "Pass deadline extended");
                self.inner.deadline.set(Some(deadline));
                true
            }
            None => {
                self.inner.deadline.set(Some(deadline));
                Self::arm(&self.inner, delay);
                true
            }
        }
    }

    /// Whether a callback invocation is currently armed
    pub fn is_pending(&self) -> bool {
        self.inner.deadline.get().is_some()
    }

    fn arm(inner: &Rc<PassInner>, delay: Duration) {
        let weak = Rc::downgrade(inner);
        inner
            .timer
            .schedule_callback(Box::new(move || Self::fire(&weak)), delay);
    }

    fn fire(weak: &Weak<PassInner>) {
        // Trigger was dropped while armed
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let Some(deadline) = inner.deadline.get() else {
            return;
        };

        let now = inner.timer.now();
        if now < deadline {
            Self::arm(&inner, deadline - now);
            return;
        }

        // Cleared first so the callback may schedule the next window.
        inner.deadline.set(None);
        (inner.callback)();
    }
}
