//! Runtime configuration
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [tree]
//! shard_count = 4
//! shard_buffer = 512
//!
//! [dispatcher]
//! drag_threshold = 8.0
//! multi_click_interval_ms = 400
//! soft_keyboard = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_core::ConfigError;

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for a tree and its dispatcher
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl RuntimeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tree.validate()?;
        self.dispatcher.validate()
    }
}

// =============================================================================
// TreeConfig
// =============================================================================

/// Update pipeline settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Number of update shards, rounded up to a power of two
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,
    /// Bounded capacity of each shard's channel
    #[serde(default = "default_shard_buffer")]
    pub shard_buffer: usize,
}

fn default_shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_shard_buffer() -> usize {
    256
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
            shard_buffer: default_shard_buffer(),
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_count == 0 {
            return Err(invalid("tree.shard_count", "must be at least 1"));
        }
        if self.shard_buffer == 0 {
            return Err(invalid("tree.shard_buffer", "must be at least 1"));
        }
        Ok(())
    }
}

// =============================================================================
// DispatcherConfig
// =============================================================================

/// Gesture, momentum and keyboard settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DispatcherConfig {
    /// Distance in px a press must travel before it becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    /// Maximum time between clicks that still counts as a multi-click
    #[serde(default = "default_multi_click_interval_ms")]
    pub multi_click_interval_ms: u64,
    /// Maximum distance in px between clicks of a multi-click
    #[serde(default = "default_multi_click_distance")]
    pub multi_click_distance: f32,
    /// Per-tick velocity multiplier during momentum
    #[serde(default = "default_momentum_friction")]
    pub momentum_friction: f32,
    /// Release speed (px/s) required to start momentum
    #[serde(default = "default_momentum_min_velocity")]
    pub momentum_min_velocity: f32,
    /// Speed (px/s) below which momentum stops
    #[serde(default = "default_momentum_stop_velocity")]
    pub momentum_stop_velocity: f32,
    /// Drags held longer than this before release get no momentum
    #[serde(default = "default_velocity_stale_ms")]
    pub velocity_stale_ms: u64,
    /// Multiplier applied to wheel deltas before scrolling
    #[serde(default = "default_wheel_line_height")]
    pub wheel_line_height: f32,
    /// Show/hide the software keyboard when focus crosses a text input
    #[serde(default = "default_soft_keyboard")]
    pub soft_keyboard: bool,
    /// Height of one option row in an open dropdown
    #[serde(default = "default_dropdown_option_height")]
    pub dropdown_option_height: f32,
}

fn default_drag_threshold() -> f32 {
    10.0
}

fn default_multi_click_interval_ms() -> u64 {
    500
}

fn default_multi_click_distance() -> f32 {
    5.0
}

fn default_momentum_friction() -> f32 {
    0.95
}

fn default_momentum_min_velocity() -> f32 {
    50.0
}

fn default_momentum_stop_velocity() -> f32 {
    5.0
}

fn default_velocity_stale_ms() -> u64 {
    300
}

fn default_wheel_line_height() -> f32 {
    1.0
}

fn default_soft_keyboard() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}

fn default_dropdown_option_height() -> f32 {
    32.0
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            drag_threshold: default_drag_threshold(),
            multi_click_interval_ms: default_multi_click_interval_ms(),
            multi_click_distance: default_multi_click_distance(),
            momentum_friction: default_momentum_friction(),
            momentum_min_velocity: default_momentum_min_velocity(),
            momentum_stop_velocity: default_momentum_stop_velocity(),
            velocity_stale_ms: default_velocity_stale_ms(),
            wheel_line_height: default_wheel_line_height(),
            soft_keyboard: default_soft_keyboard(),
            dropdown_option_height: default_dropdown_option_height(),
        }
    }
}

impl DispatcherConfig {
    pub fn multi_click_interval(&self) -> Duration {
        Duration::from_millis(self.multi_click_interval_ms)
    }

    pub fn velocity_stale(&self) -> Duration {
        Duration::from_millis(self.velocity_stale_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.drag_threshold >= 0.0) {
            return Err(invalid("dispatcher.drag_threshold", "must be non-negative"));
        }
        if !(self.multi_click_distance >= 0.0) {
            return Err(invalid("dispatcher.multi_click_distance", "must be non-negative"));
        }
        if !(self.momentum_friction > 0.0 && self.momentum_friction < 1.0) {
            return Err(invalid("dispatcher.momentum_friction", "must be in (0, 1)"));
        }
        if !(self.momentum_stop_velocity >= 0.0) {
            return Err(invalid("dispatcher.momentum_stop_velocity", "must be non-negative"));
        }
        if !(self.dropdown_option_height > 0.0) {
            return Err(invalid("dispatcher.dropdown_option_height", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
