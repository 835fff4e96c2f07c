//! Common test utilities
#![allow(dead_code)] // Not every helper is used by every test file

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use render_kit_scheduler::{RenderPass, RenderSink, Timer, TimerCallback};
use tokio::task::LocalSet;
use tokio::time::Instant;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Run a future on a paused current-thread runtime inside a `LocalSet`
pub fn run_local<F: Future>(future: F) -> F::Output {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("failed to build test runtime");
    LocalSet::new().block_on(&runtime, future)
}

pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// One observed render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRecord {
    pub data: u32,
    pub started: Instant,
    pub finished: Instant,
}

/// Sink that records passes and checks they never overlap
pub struct RecordingSink {
    pub render_time: Duration,
    pub fail_on: Vec<u32>,
    pub records: RefCell<Vec<RenderRecord>>,
    in_flight: Cell<usize>,
    pub max_in_flight: Cell<usize>,
}

impl RecordingSink {
    pub fn new(render_time: Duration) -> Rc<Self> {
        Self::failing_on(render_time, Vec::new())
    }

    pub fn failing_on(render_time: Duration, fail_on: Vec<u32>) -> Rc<Self> {
        Rc::new(Self {
            render_time,
            fail_on,
            records: RefCell::new(Vec::new()),
            in_flight: Cell::new(0),
            max_in_flight: Cell::new(0),
        })
    }

    pub fn rendered(&self) -> Vec<u32> {
        self.records.borrow().iter().map(|r| r.data).collect()
    }
}

#[async_trait(?Send)]
impl RenderSink<u32, ()> for RecordingSink {
    async fn render(&self, pass: RenderPass<'_, u32, ()>) -> Result<()> {
        let started = Instant::now();
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        tokio::time::sleep(self.render_time).await;

        self.in_flight.set(self.in_flight.get() - 1);
        self.records.borrow_mut().push(RenderRecord {
            data: *pass.data,
            started,
            finished: Instant::now(),
        });
        if self.fail_on.contains(pass.data) {
            bail!("render of {} failed", pass.data);
        }
        Ok(())
    }
}

/// Virtual clock; callbacks only run from [`ManualTimer::advance`]
pub struct ManualTimer {
    origin: Instant,
    elapsed: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<BTreeMap<(Duration, u64), TimerCallback>>,
}

impl ManualTimer {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            next_seq: Cell::new(0),
            queue: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn scheduled(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward, running due callbacks in deadline order
    pub fn advance(&self, by: Duration) {
        let target = self.elapsed.get() + by;
        loop {
            let due = {
                let mut queue = self.queue.borrow_mut();
                match queue.keys().next().copied() {
                    Some(key) if key.0 <= target => queue.remove(&key).map(|cb| (key.0, cb)),
                    _ => None,
                }
            };
            let Some((at, callback)) = due else {
                break;
            };
            self.elapsed.set(at);
            callback();
        }
        self.elapsed.set(target);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn schedule_callback(&self, callback: TimerCallback, delay: Duration) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue
            .borrow_mut()
            .insert((self.elapsed.get() + delay, seq), callback);
    }
}
