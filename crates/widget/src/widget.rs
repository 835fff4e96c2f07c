//! The render widget: fetches from its `src` and feeds the scheduler

use std::cell::RefCell;
use std::rc::Rc;

use render_kit_scheduler::{RenderScheduler, RenderSink};
use serde_json::Value;

use crate::config::Config;
use crate::error::WidgetError;
use crate::fetch::{DataSource, WidgetHooks};
use crate::items::ItemSelector;
use crate::source::Source;

/// Items handed to the render sink
pub type Items = Vec<Value>;

/// Scheduler type used by widgets; the raw response is the auxiliary payload
pub type WidgetScheduler = RenderScheduler<Items, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Merge the fetched items with what is already rendered
    pub append: bool,
}

/// Fetches data for its `src` and schedules it for rendering
pub struct RenderWidget {
    src: RefCell<Option<String>>,
    selector: ItemSelector,
    source: Rc<dyn DataSource>,
    hooks: Rc<dyn WidgetHooks>,
    scheduler: Rc<WidgetScheduler>,
}

impl RenderWidget {
    pub fn new(
        config: Config,
        source: Rc<dyn DataSource>,
        sink: Rc<dyn RenderSink<Items, Value>>,
        hooks: Rc<dyn WidgetHooks>,
    ) -> Self {
        let selector = ItemSelector::from(&config.widget);
        Self {
            src: RefCell::new(config.widget.src),
            selector,
            source,
            hooks,
            scheduler: RenderScheduler::new(config.scheduler, sink),
        }
    }

    pub fn src(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    /// Point the widget at a new source; in-flight fetches for the old one are discarded
    pub fn set_src(&self, src: Option<String>) {
        *self.src.borrow_mut() = src;
    }

    pub const fn scheduler(&self) -> &Rc<WidgetScheduler> {
        &self.scheduler
    }

    /// Fetch from `src` and resolve once the fetched items are rendered
    ///
    /// Resolves immediately when there is no `src`, and without rendering
    /// when `src` changed while the fetch was in flight.
    pub async fn fetch_data(&self, options: FetchOptions) -> Result<(), WidgetError> {
        let Some(src) = self.src() else {
            return Ok(());
        };

        let data = match self.fetch(&src).await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(src = %src, append = options.append, error = %error, "Fetch failed");
                // Append flow has its own error handling
                if !options.append {
                    self.hooks.fetch_error(&error);
                    self.hooks.show_fallback();
                }
                return Err(error);
            }
        };

        if self.src.borrow().as_deref() != Some(src.as_str()) {
            tracing::debug!(src = %src, "Source changed during fetch, dropping response");
            return Ok(());
        }

        let items = self.selector.select(&data)?;
        tracing::debug!(src = %src, items = items.len(), "Scheduling fetched items");
        self.scheduler
            .submit(items, options.append, Some(data))
            .await?;
        Ok(())
    }

    async fn fetch(&self, src: &str) -> Result<Value, WidgetError> {
        let source = Source::parse(src)?;
        self.source.fetch(&source).await.map_err(WidgetError::Fetch)
    }
}
