// SPDX-License-Identifier: PMPL-1.0-or-later
//! Engine configuration
//!
//! Thresholds follow the WCAG 2.1 reference values. Every field has a
//! default, so a partial TOML file only overrides what it names.

use crate::error::{EngineError, Result};
use crate::model::WcagLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Conformance level rules check against (contrast uses it to decide
    /// whether AAA ratios are required)
    pub target_level: WcagLevel,

    /// Fan rules out across the rayon pool
    pub parallel: bool,

    /// Rule ids left out of the default registry
    pub disabled_rules: Vec<String>,

    /// Numeric thresholds used by the CSS and contrast rules
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_level: WcagLevel::AA,
            parallel: true,
            disabled_rules: Vec::new(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Numeric thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Root font size used to resolve rem/em/% and keyword sizes
    pub base_font_px: f64,
    /// Smallest acceptable declared font size
    pub min_font_px: f64,
    /// Smallest acceptable body-text line height (as a ratio)
    pub min_line_height: f64,
    /// Smallest acceptable interactive target edge
    pub min_touch_target_px: f64,
    /// Animations shorter than this run faster than three cycles per second
    pub min_animation_ms: f64,
    /// Scale factor at or beyond which a transform counts as large
    pub large_scale_factor: f64,
    /// Rotation at or beyond which a transform counts as large
    pub large_rotation_deg: f64,
    /// Translation at or beyond which a transform counts as large
    pub large_translate_px: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            base_font_px: 16.0,
            min_font_px: 12.0,
            min_line_height: 1.2,
            min_touch_target_px: 44.0,
            min_animation_ms: 333.0,
            large_scale_factor: 1.5,
            large_rotation_deg: 90.0,
            large_translate_px: 100.0,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject thresholds that would make rules meaningless
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        let positive = [
            ("base_font_px", t.base_font_px),
            ("min_font_px", t.min_font_px),
            ("min_line_height", t.min_line_height),
            ("min_touch_target_px", t.min_touch_target_px),
            ("min_animation_ms", t.min_animation_ms),
            ("large_rotation_deg", t.large_rotation_deg),
            ("large_translate_px", t.large_translate_px),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::Config(format!(
                    "thresholds.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !(t.large_scale_factor.is_finite() && t.large_scale_factor > 1.0) {
            return Err(EngineError::Config(format!(
                "thresholds.large_scale_factor must be greater than 1, got {}",
                t.large_scale_factor
            )));
        }
        Ok(())
    }

    /// Whether a rule id is disabled
    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rules.iter().any(|r| r == rule_id)
    }
}

/// Load configuration from a TOML file, falling back to defaults when
/// the file does not exist
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = EngineConfig::from_toml_str(&content)?;

    debug!(?config, "Loaded configuration");
    Ok(config)
}
