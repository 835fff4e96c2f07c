//! Render sink trait - the collaborator that performs the visual update

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Everything a sink needs for one render pass
#[derive(Debug)]
pub struct RenderPass<'a, D, P> {
    /// Monotonic id of the request being rendered
    pub id: u64,
    pub data: &'a D,
    /// Merge with previously rendered output instead of replacing it
    pub append: bool,
    /// Side payload for post-render hooks (e.g. pagination metadata)
    pub payload: Option<&'a P>,
    /// Data of the last pass that completed without being raced
    pub last_rendered: Option<&'a D>,
}

impl<D, P> Clone for RenderPass<'_, D, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, P> Copy for RenderPass<'_, D, P> {}

/// Payload handed to an append pass that was submitted without one
pub trait EmptyPayload {
    fn empty() -> Self;
}

impl EmptyPayload for () {
    fn empty() -> Self {}
}

impl EmptyPayload for String {
    fn empty() -> Self {
        Self::new()
    }
}

/// `{}`
impl EmptyPayload for Value {
    fn empty() -> Self {
        Self::Object(Map::new())
    }
}

/// Performs the actual visual update for a pass
///
/// Futures are awaited on the scheduler's single thread, so they need not
/// be `Send`. A sink must eventually settle; a render that never completes
/// stalls the scheduler.
#[async_trait(?Send)]
pub trait RenderSink<D: 'static, P: 'static> {
    async fn render(&self, pass: RenderPass<'_, D, P>) -> Result<()>;
}
