use std::rc::Rc;

use crate::deferred::Abandoned;

/// Why a submitted render did not complete successfully
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    /// The render sink failed. Every request settled by that pass shares the error.
    #[error("render sink failed: {0}")]
    Sink(Rc<anyhow::Error>),

    /// Replaced by a newer submission before its pass started
    #[error("render request superseded by a newer submission")]
    Superseded,

    /// The scheduler was dropped before the request settled
    #[error("render request dropped before it settled")]
    Cancelled,
}

impl RenderError {
    pub fn sink(error: anyhow::Error) -> Self {
        Self::Sink(Rc::new(error))
    }

    /// The underlying sink error, if this is a sink failure
    pub fn sink_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Sink(error) => Some(error),
            Self::Superseded | Self::Cancelled => None,
        }
    }

    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

impl From<Abandoned> for RenderError {
    fn from(_: Abandoned) -> Self {
        Self::Cancelled
    }
}
