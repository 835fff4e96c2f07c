//! Host clock primitive used by the pass trigger
//!
//! The scheduler never sleeps on its own. It hands callbacks to a [`Timer`],
//! which runs them on the host's single-threaded task queue.

use std::time::Duration;

use tokio::time::Instant;

/// Callback handed to a [`Timer`]
pub type TimerCallback = Box<dyn FnOnce()>;

/// Monotonic, single-threaded timer
pub trait Timer {
    /// Current time on the timer's clock
    fn now(&self) -> Instant;

    /// Run `callback` once after `delay` has elapsed
    fn schedule_callback(&self, callback: TimerCallback, delay: Duration);
}

/// Timer backed by the tokio clock
///
/// Callbacks are spawned with [`tokio::task::spawn_local`], so scheduling
/// must happen inside a [`tokio::task::LocalSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule_callback(&self, callback: TimerCallback, delay: Duration) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}
