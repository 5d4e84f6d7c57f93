//! Configuration types and loading for knowmore.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{APP_NAME, DEFAULT_WEB_SEARCH_TOOL, env_prefix};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tool name whose invocations are aggregated into the sources block.
    pub web_search_tool: String,

    /// How long the copied indicator stays lit, in milliseconds.
    pub copy_feedback_ms: u64,

    /// Terminal rendering options.
    pub render: RenderConfig,

    /// Stream replay options.
    pub replay: ReplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_search_tool: DEFAULT_WEB_SEARCH_TOOL.to_string(),
            copy_feedback_ms: 2000,
            render: RenderConfig::default(),
            replay: ReplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join("config.toml")
    }

    /// Save configuration to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Ensure config exists at the given path, creating defaults if missing.
    pub fn ensure_at(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            let mut config = Self::default();
            config.save_to_path(path)?;
            config.apply_env_overrides()?;
            Ok(config)
        }
    }

    /// Apply `KNOWMORE_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        let prefix = env_prefix();

        if let Ok(tool) = std::env::var(format!("{prefix}_WEB_SEARCH_TOOL")) {
            let tool = tool.trim();
            if !tool.is_empty() {
                self.web_search_tool = tool.to_string();
            }
        }

        let key = format!("{prefix}_COPY_FEEDBACK_MS");
        if let Ok(raw) = std::env::var(&key) {
            self.copy_feedback_ms = raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {key} value {raw:?}: {e}")))?;
        }

        Ok(())
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// How view models are drawn in the terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Previews longer than this are truncated with an ellipsis.
    pub max_preview_chars: usize,

    /// Maximum filter tags shown above the source list.
    pub max_tags: usize,

    /// Show the copy / helpful / not-helpful row under assistant messages.
    pub show_affordances: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_preview_chars: 160,
            max_tags: 8,
            show_affordances: true,
        }
    }
}

/// Stream replay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Pause between applied lines, in milliseconds.
    pub frame_delay_ms: u64,

    /// Print a summary line for every intermediate frame.
    pub print_frames: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 0,
            print_frames: true,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
