//! Coalescing, single-flight render scheduler
//!
//! The scheduler owns two slots:
//! - the pending slot, holding at most one pending request. A new
//!   submission replaces it in place instead of queueing.
//! - the last-rendered slot, holding the data of the most recent pass that
//!   completed while its request was still the pending one.
//!
//! A pass pins the pending request when it starts. When the sink finishes,
//! the pinned request is compared against the live slot. If a newer request
//! arrived in the meantime another pass is scheduled after a short repaint
//! delay; otherwise the slot is cleared. Only then is the pinned request's
//! future settled, so awaiting code always observes the updated slots.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::{SchedulerConfig, SupersedePolicy};
use crate::deferred::{Deferred, Promise, Resolver};
use crate::error::RenderError;
use crate::pass::Pass;
use crate::sink::{EmptyPayload, RenderPass, RenderSink};
use crate::timer::{Timer, TokioTimer};

/// Future returned by [`RenderScheduler::submit`]
pub type RenderFuture = Promise<(), RenderError>;

type RenderResolver = Resolver<(), RenderError>;

/// One outstanding request to render data
struct PendingRender<D, P> {
    id: u64,
    data: Rc<D>,
    append: bool,
    payload: Option<P>,
    resolver: RenderResolver,
    /// Superseded requests settled together with this one
    riders: Vec<RenderResolver>,
}

impl<D, P> PendingRender<D, P> {
    fn settle(&self, result: &Result<(), RenderError>) {
        for rider in &self.riders {
            rider.settle(result.clone());
        }
        self.resolver.settle(result.clone());
    }
}

/// Counters for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub passes: u64,
    pub superseded: u64,
    pub failures: u64,
}

/// Schedules render passes over a stream of submitted data
///
/// Not thread-safe: all calls must come from the thread (and `LocalSet`)
/// that drives the timer.
pub struct RenderScheduler<D: 'static, P: 'static> {
    config: SchedulerConfig,
    sink: Rc<dyn RenderSink<D, P>>,
    pass: Pass,
    pending: RefCell<Option<Rc<PendingRender<D, P>>>>,
    last_rendered: RefCell<Option<Rc<D>>>,
    /// Id of the request pinned by the pass in flight
    rendering: Cell<Option<u64>>,
    next_id: Cell<u64>,
    stats: Cell<SchedulerStats>,
}

impl<D: 'static, P: 'static> RenderScheduler<D, P> {
    /// Create a scheduler driven by the tokio clock
    pub fn new(config: SchedulerConfig, sink: Rc<dyn RenderSink<D, P>>) -> Rc<Self> {
        Self::with_timer(config, sink, Rc::new(TokioTimer))
    }

    pub fn with_timer(
        config: SchedulerConfig,
        sink: Rc<dyn RenderSink<D, P>>,
        timer: Rc<dyn Timer>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let pass = Pass::new(timer, move || {
                if let Some(scheduler) = weak.upgrade() {
                    scheduler.start_pass();
                }
            });
            Self {
                config,
                sink,
                pass,
                pending: RefCell::new(None),
                last_rendered: RefCell::new(None),
                rendering: Cell::new(None),
                next_id: Cell::new(1),
                stats: Cell::new(SchedulerStats::default()),
            }
        })
    }

    /// Schedule `data` to be rendered in the near future
    ///
    /// Replaces any request that has not started rendering yet. The returned
    /// future settles once a pass has rendered this request.
    pub fn submit(&self, data: D, append: bool, payload: Option<P>) -> RenderFuture
    where
        P: EmptyPayload,
    {
        let Deferred { promise, resolver } = Deferred::new();
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.record(|stats| stats.submitted += 1);

        let previous = self.pending.borrow_mut().take();
        if previous.is_none() {
            self.pass.schedule(self.config.initial_delay());
        }

        // Append merges need a payload object once something is on screen.
        let payload = if append && self.last_rendered.borrow().is_some() {
            Some(payload.unwrap_or_else(P::empty))
        } else {
            payload
        };

        // A request pinned by the pass in flight is settled by that pass.
        let superseded = previous.filter(|previous| Some(previous.id) != self.rendering.get());
        let mut riders = Vec::new();
        if let Some(previous) = &superseded {
            self.record(|stats| stats.superseded += 1);
            tracing::debug!(
                superseded = previous.id,
                by = id,
                policy = ?self.config.supersede_policy,
                "Render request superseded"
            );
            if self.config.supersede_policy == SupersedePolicy::Coalesce {
                riders.push(previous.resolver.clone());
                riders.extend(previous.riders.iter().cloned());
            }
        }

        *self.pending.borrow_mut() = Some(Rc::new(PendingRender {
            id,
            data: Rc::new(data),
            append,
            payload,
            resolver,
            riders,
        }));
        tracing::trace!(request = id, append, "Render request submitted");

        if let Some(previous) = superseded {
            if self.config.supersede_policy == SupersedePolicy::Reject {
                previous.settle(&Err(RenderError::Superseded));
            }
        }

        promise
    }

    /// Data of the last pass that completed without a newer submission racing it
    pub fn last_rendered(&self) -> Option<Rc<D>> {
        self.last_rendered.borrow().clone()
    }

    /// Whether a request is waiting for, or currently in, a pass
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering.get().is_some()
    }

    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.get()
    }

    fn record(&self, update: impl FnOnce(&mut SchedulerStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Invoked by the pass trigger only
    fn start_pass(self: Rc<Self>) {
        let current = self.pending.borrow().clone();
        let Some(current) = current else {
            panic!("render pass triggered with nothing to render");
        };
        assert!(
            self.rendering.get().is_none(),
            "render pass started while another pass is in flight"
        );

        self.rendering.set(Some(current.id));
        self.record(|stats| stats.passes += 1);
        tokio::task::spawn_local(self.run_pass(current));
    }

    async fn run_pass(self: Rc<Self>, current: Rc<PendingRender<D, P>>) {
        let last_rendered = self.last_rendered();
        tracing::debug!(pass = current.id, append = current.append, "Render pass started");

        let result = self
            .sink
            .render(RenderPass {
                id: current.id,
                data: &current.data,
                append: current.append,
                payload: current.payload.as_ref(),
                last_rendered: last_rendered.as_deref(),
            })
            .await;
        self.rendering.set(None);

        let raced = self
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|pending| !Rc::ptr_eq(pending, &current));
        if raced {
            tracing::debug!(pass = current.id, "Data changed during render, scheduling next pass");
            self.pass.schedule(self.config.repaint_delay());
        } else {
            if result.is_ok() {
                *self.last_rendered.borrow_mut() = Some(Rc::clone(&current.data));
            }
            *self.pending.borrow_mut() = None;
        }

        let result = result.map_err(|error| {
            self.record(|stats| stats.failures += 1);
            RenderError::sink(error)
        });
        tracing::debug!(pass = current.id, ok = result.is_ok(), raced, "Render pass finished");
        current.settle(&result);
    }
}

impl<D: 'static, P: 'static> fmt::Debug for RenderScheduler<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("config", &self.config)
            .field("pending", &self.pending.borrow().as_ref().map(|p| p.id))
            .field("rendering", &self.rendering.get())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}
