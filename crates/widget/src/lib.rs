//! render-kit widget
//!
//! Glue between a data source and the render scheduler: parses the widget's
//! `src`, fetches the response, extracts the items to render and submits them.

pub mod config;
pub mod error;
pub mod fetch;
pub mod items;
pub mod source;
pub mod widget;

pub use config::{Config, WidgetConfig};
pub use error::WidgetError;
pub use fetch::{DataSource, NoopHooks, WidgetHooks};
pub use items::{value_for_expr, ItemSelector};
pub use source::Source;
pub use widget::{FetchOptions, Items, RenderWidget, WidgetScheduler};
