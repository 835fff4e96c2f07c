//! render-kit scheduler
//!
//! Decides when render passes run for a widget whose data arrives
//! asynchronously. At most one pass is in flight at a time, intermediate
//! submissions are coalesced, and every submitter gets a future that settles
//! once its data (or the data that replaced it) has been rendered.
//!
//! Everything here is single-threaded: state lives in `Rc`/`RefCell` and
//! passes run on a tokio [`LocalSet`](tokio::task::LocalSet).

pub mod config;
pub mod deferred;
pub mod error;
pub mod pass;
pub mod scheduler;
pub mod sink;
pub mod timer;

pub use config::{SchedulerConfig, SupersedePolicy};
pub use deferred::{Abandoned, Deferred, Promise, Resolver};
pub use error::RenderError;
pub use pass::Pass;
pub use scheduler::{RenderFuture, RenderScheduler, SchedulerStats};
pub use sink::{EmptyPayload, RenderPass, RenderSink};
pub use timer::{Timer, TimerCallback, TokioTimer};
