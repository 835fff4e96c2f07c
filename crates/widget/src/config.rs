//! Configuration for render-kit widgets
//!
//! Reads config from ~/.config/render-kit/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use render_kit_scheduler::SchedulerConfig;
use serde::Deserialize;

/// Per-widget settings, mirroring the element attributes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub src: Option<String>,
    /// Path to the items array in the response; `"."` selects the whole response
    pub items: String,
    pub single_item: bool,
    pub max_items: Option<usize>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            src: None,
            items: "items".to_string(),
            single_item: false,
            max_items: None,
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub widget: WidgetConfig,
}

impl Config {
    /// Load configuration from default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_or_default(&Self::default_config_path())
    }

    /// Load configuration from `path`; a missing or invalid file yields defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_path(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config");
            Self::default()
        })
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("render-kit")
            .join("config.toml")
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
