//! Portal configuration
//!
//! Loaded from a JSON file, then optionally overridden from environment
//! variables:
//!
//! - `PORTAL_UNKNOWN_METHOD`: `skip` or `defaultToRead`
//! - `PORTAL_EXPAND_WILDCARDS`: `true` / `false`
//! - `PORTAL_MAX_DEPTH`: reply depth shown by renderers (`none` for unbounded)

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::{PortalError, PortalResult};
use crate::permissions::{AbilityOptions, UnknownMethodPolicy};

/// Display options for the comment and ability renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Reply levels to show below each root; `None` shows everything
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Whether to color terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            color: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// How permission records compile
    #[serde(default)]
    pub ability: AbilityOptions,

    /// How results are displayed
    #[serde(default)]
    pub render: RenderOptions,
}

impl PortalConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ability options
    pub fn with_ability(mut self, ability: AbilityOptions) -> Self {
        self.ability = ability;
        self
    }

    /// Set the maximum rendered reply depth
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.render.max_depth = max_depth;
        self
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, color: bool) -> Self {
        self.render.color = color;
        self
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> PortalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> PortalResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: PortalConfig = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `PORTAL_*` environment overrides
    pub fn apply_env(self) -> PortalResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> PortalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORTAL_UNKNOWN_METHOD") {
            self.ability.unknown_method = match value.trim() {
                "skip" => UnknownMethodPolicy::Skip,
                "defaultToRead" | "default_to_read" => UnknownMethodPolicy::DefaultToRead,
                other => {
                    return Err(PortalError::invalid_config(format!(
                        "PORTAL_UNKNOWN_METHOD must be `skip` or `defaultToRead`, got `{other}`"
                    )))
                }
            };
        }

        if let Some(value) = lookup("PORTAL_EXPAND_WILDCARDS") {
            self.ability.expand_wildcards = value.trim().parse().map_err(|_| {
                PortalError::invalid_config(format!(
                    "PORTAL_EXPAND_WILDCARDS must be `true` or `false`, got `{value}`"
                ))
            })?;
        }

        if let Some(value) = lookup("PORTAL_MAX_DEPTH") {
            self.render.max_depth = match value.trim() {
                "" | "none" => None,
                depth => Some(depth.parse().map_err(|_| {
                    PortalError::invalid_config(format!(
                        "PORTAL_MAX_DEPTH must be a number or `none`, got `{depth}`"
                    ))
                })?),
            };
        }

        Ok(self)
    }
}
