//! Widget `src` attribute parsing
//!
//! Supported forms:
//! - `amp-script:scriptId.functionIdentifier` - data produced by a script function
//! - `amp-state:key` - data taken from a named state object
//! - anything else - a URL handed to the data source as is

use std::fmt;

use crate::error::WidgetError;

pub const AMP_SCRIPT_URI_SCHEME: &str = "amp-script:";
pub const AMP_STATE_URI_SCHEME: &str = "amp-state:";

/// Parsed data source reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Script { script_id: String, function: String },
    State { key: String },
    Url(String),
}

impl Source {
    pub fn parse(src: &str) -> Result<Self, WidgetError> {
        if let Some(rest) = src.strip_prefix(AMP_SCRIPT_URI_SCHEME) {
            let invalid = || WidgetError::InvalidSource {
                src: src.to_string(),
                reason: "script sources must be of the format \"scriptId.functionIdentifier\"",
            };
            let mut parts = rest.split('.');
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(script_id), Some(function), None)
                    if !script_id.is_empty() && !function.is_empty() =>
                {
                    Ok(Self::Script {
                        script_id: script_id.to_string(),
                        function: function.to_string(),
                    })
                }
                _ => Err(invalid()),
            };
        }

        if let Some(key) = src.strip_prefix(AMP_STATE_URI_SCHEME) {
            if key.is_empty() {
                return Err(WidgetError::InvalidSource {
                    src: src.to_string(),
                    reason: "state sources need a state key",
                });
            }
            return Ok(Self::State {
                key: key.to_string(),
            });
        }

        Ok(Self::Url(src.to_string()))
    }

    pub const fn is_script(&self) -> bool {
        matches!(self, Self::Script { .. })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script {
                script_id,
                function,
            } => write!(f, "{AMP_SCRIPT_URI_SCHEME}{script_id}.{function}"),
            Self::State { key } => write!(f, "{AMP_STATE_URI_SCHEME}{key}"),
            Self::Url(url) => f.write_str(url),
        }
    }
}
