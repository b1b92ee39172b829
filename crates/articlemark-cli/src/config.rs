//! User configuration
//!
//! Read from `--config` or `<config dir>/articlemark/config.toml`. Every field
//! is optional; a missing default file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use articlemark_core::StyleConfig;
use serde::{Deserialize, Serialize};

use crate::themes::{Theme, DEFAULT_THEME, THEME_REGISTRY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of a built-in theme
    pub theme: String,
    /// Wrap width in cells; the terminal width when unset
    pub wrap_width: Option<usize>,
    /// Emit OSC 8 hyperlinks for links
    pub hyperlinks: bool,
    /// Renderer style replacing the theme's own
    pub style: Option<StyleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            wrap_width: None,
            hyperlinks: true,
            style: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("articlemark").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => {
                tracing::debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The configured theme with the configured style applied
    pub fn resolve_theme(&self) -> Theme {
        let theme = THEME_REGISTRY.get(&self.theme).cloned().unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme, using {DEFAULT_THEME}");
            THEME_REGISTRY
                .get(DEFAULT_THEME)
                .cloned()
                .unwrap_or_else(|| crate::themes::definitions::dark::dark())
        });
        match &self.style {
            Some(style) => theme.with_style(style.clone()),
            None => theme,
        }
    }
}
