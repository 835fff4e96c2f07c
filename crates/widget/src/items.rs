//! Extracting the list of items to render from a fetched JSON response

use serde_json::Value;

use crate::config::WidgetConfig;
use crate::error::WidgetError;

/// Expression that selects the whole response
pub const WHOLE_RESPONSE: &str = ".";

/// Resolve a dot-separated path against a JSON value
///
/// Object keys and array indices are both plain segments (`items.0.name`).
/// Empty segments are skipped. Returns `None` as soon as a segment misses.
pub fn value_for_expr<'a>(value: &'a Value, expr: &str) -> Option<&'a Value> {
    expr.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(value, |current, part| match current {
            Value::Object(map) => map.get(part),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Turns a response into the array the render sink receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSelector {
    pub items: String,
    pub single_item: bool,
    pub max_items: Option<usize>,
}

impl Default for ItemSelector {
    fn default() -> Self {
        Self {
            items: "items".to_string(),
            single_item: false,
            max_items: None,
        }
    }
}

impl From<&WidgetConfig> for ItemSelector {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            items: config.items.clone(),
            single_item: config.single_item,
            max_items: config.max_items,
        }
    }
}

impl ItemSelector {
    pub fn select(&self, data: &Value) -> Result<Vec<Value>, WidgetError> {
        let found = if self.items == WHOLE_RESPONSE {
            Some(data)
        } else {
            value_for_expr(data, &self.items)
        };
        let found = found.ok_or_else(|| WidgetError::MissingItems {
            expr: self.items.clone(),
        })?;

        let mut items = match found {
            Value::Array(items) => {
                if self.single_item {
                    tracing::warn!(
                        expr = %self.items,
                        "Expected a non-array object because single-item is set"
                    );
                }
                items.clone()
            }
            other if self.single_item => vec![other.clone()],
            _ => {
                return Err(WidgetError::NotAnArray {
                    expr: self.items.clone(),
                })
            }
        };

        if let Some(max) = self.max_items {
            items.truncate(max);
        }
        Ok(items)
    }
}
