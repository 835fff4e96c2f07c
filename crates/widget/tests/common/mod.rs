//! Common test utilities
#![allow(dead_code)] // Not every helper is used by every test file

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use render_kit_scheduler::{RenderPass, RenderSink};
use render_kit_widget::{DataSource, Items, Source, WidgetError, WidgetHooks};
use serde_json::Value;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Serves canned responses keyed by the source's string form
#[derive(Default)]
pub struct MockSource {
    pub latency: Duration,
    pub responses: RefCell<HashMap<String, Value>>,
    pub requests: RefCell<Vec<Source>>,
}

impl MockSource {
    pub fn with_response(src: &str, response: Value) -> Rc<Self> {
        let source = Self::default();
        source.responses.borrow_mut().insert(src.to_string(), response);
        Rc::new(source)
    }

    pub fn slow(latency: Duration) -> Rc<Self> {
        Rc::new(Self {
            latency,
            ..Self::default()
        })
    }
}

#[async_trait(?Send)]
impl DataSource for MockSource {
    async fn fetch(&self, source: &Source) -> Result<Value> {
        self.requests.borrow_mut().push(source.clone());
        tokio::time::sleep(self.latency).await;
        self.responses
            .borrow()
            .get(&source.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("404 for {source}"))
    }
}

/// What the sink saw for one pass
#[derive(Debug, Clone, PartialEq)]
pub struct SinkCall {
    pub items: Items,
    pub append: bool,
    pub payload: Option<Value>,
}

#[derive(Default)]
pub struct RecordingSink {
    pub calls: RefCell<Vec<SinkCall>>,
}

#[async_trait(?Send)]
impl RenderSink<Items, Value> for RecordingSink {
    async fn render(&self, pass: RenderPass<'_, Items, Value>) -> Result<()> {
        self.calls.borrow_mut().push(SinkCall {
            items: pass.data.clone(),
            append: pass.append,
            payload: pass.payload.cloned(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    pub errors: RefCell<Vec<String>>,
    pub fallbacks: Cell<usize>,
}

impl WidgetHooks for RecordingHooks {
    fn fetch_error(&self, error: &WidgetError) {
        self.errors.borrow_mut().push(error.to_string());
    }

    fn show_fallback(&self) {
        self.fallbacks.set(self.fallbacks.get() + 1);
    }
}
