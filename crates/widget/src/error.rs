use render_kit_scheduler::RenderError;

/// Errors surfaced by [`RenderWidget::fetch_data`](crate::RenderWidget::fetch_data)
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("invalid source {src:?}: {reason}")]
    InvalidSource { src: String, reason: &'static str },

    #[error("response must contain an array or object at {expr:?}")]
    MissingItems { expr: String },

    #[error("expected an array of items at {expr:?}")]
    NotAnArray { expr: String },

    #[error("failed to fetch data: {0}")]
    Fetch(#[source] anyhow::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl WidgetError {
    /// Whether the error happened before any data reached the scheduler
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::InvalidSource { .. } | Self::Fetch(_))
    }
}
