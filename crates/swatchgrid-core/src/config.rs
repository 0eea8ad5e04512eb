//! Text color picker configuration.

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::DEFAULT_COLUMNS;
use crate::palette::{ColorValue, DEFAULT_COLORS, PaletteError};
use crate::position::PositionMode;
use crate::registry::ContextId;

/// Delay before reading the applied color back from the host.
///
/// Tuned against the host's asynchronous style application; a heuristic,
/// not a guarantee.
pub const DEFAULT_READBACK_DELAY_MS: u64 = 20;

/// Interval between eager overlay creations in [`crate::TextColorController::prepare`].
pub const DEFAULT_PREPARE_INTERVAL_MS: u64 = 100;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color in context {context}: {source}")]
    Color {
        context: String,
        #[source]
        source: PaletteError,
    },
    #[error("Column count must be at least 1")]
    ZeroColumns,
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextColorConfig {
    /// Colors offered in contexts without an override.
    pub colors: Vec<String>,
    /// Per-context color lists. An empty list disables the picker there.
    pub contexts: HashMap<String, Vec<String>>,
    pub position_mode: PositionMode,
    pub columns: usize,
    pub readback_delay_ms: u64,
    pub prepare_interval_ms: u64,
    /// Vertical space between the anchor and the overlay.
    pub anchor_gap: f64,
}

impl Default for TextColorConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            contexts: HashMap::new(),
            position_mode: PositionMode::Absolute,
            columns: DEFAULT_COLUMNS,
            readback_delay_ms: DEFAULT_READBACK_DELAY_MS,
            prepare_interval_ms: DEFAULT_PREPARE_INTERVAL_MS,
            anchor_gap: 0.0,
        }
    }
}

impl TextColorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        let lists = std::iter::once(("*", &self.colors))
            .chain(self.contexts.iter().map(|(k, v)| (k.as_str(), v)));
        for (context, colors) in lists {
            for color in colors {
                ColorValue::parse(color).map_err(|source| ConfigError::Color {
                    context: context.to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// The colors configured for `context`.
    pub fn colors_for(&self, context: &ContextId) -> &[String] {
        self.contexts
            .get(context.as_str())
            .unwrap_or(&self.colors)
    }

    pub fn readback_delay(&self) -> Duration {
        Duration::from_millis(self.readback_delay_ms)
    }

    pub fn prepare_interval(&self) -> Duration {
        Duration::from_millis(self.prepare_interval_ms)
    }
}
