//! Collaborator traits for fetching data and reporting fetch failures

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::WidgetError;
use crate::source::Source;

/// Produces the JSON response for a [`Source`]
///
/// The transport behind it (batched XHR, script call, state lookup) is up to
/// the host.
#[async_trait(?Send)]
pub trait DataSource {
    async fn fetch(&self, source: &Source) -> Result<Value>;
}

/// Reactions to a failed non-append fetch
///
/// Default implementations do nothing.
pub trait WidgetHooks {
    /// Dispatch the widget's fetch-error event
    fn fetch_error(&self, _error: &WidgetError) {}

    /// Replace the widget content with its fallback
    fn show_fallback(&self) {}
}

/// Hooks that ignore every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl WidgetHooks for NoopHooks {}
