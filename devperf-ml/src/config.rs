//! Evaluation configuration (`eval.toml`) parser.
//!
//! ```toml
//! device = "auto"
//! batch_size = 32
//! preset = "opv"
//!
//! # custom heads, used when `preset` is absent
//! [[targets]]
//! name = "PCE"
//! lower = -5.0
//! upper = 1.5
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::loss::ThresholdedMseLoss;
use crate::error::{DevPerfError, Result};
use crate::eval::{Preset, Target, TargetSet};
use crate::inference::DeviceRequest;

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Requested device (default: auto)
    #[serde(default)]
    pub device: DeviceRequest,

    /// Samples per batch (default: 32)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Built-in target set name (opv when neither this nor `targets` is set)
    #[serde(default)]
    pub preset: Option<String>,

    /// Custom targets, in model output order
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// One `[[targets]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub lower: f64,
    pub upper: f64,

    /// Power applied to the squared error outside `[lower, upper]`
    #[serde(default = "default_power")]
    pub out_of_range_power: u32,
}

fn default_batch_size() -> usize {
    32
}

fn default_power() -> u32 {
    1
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            device: DeviceRequest::Auto,
            batch_size: default_batch_size(),
            preset: Some(Preset::Opv.name().to_string()),
            targets: Vec::new(),
        }
    }
}

impl EvalConfig {
    pub fn from_str(content: &str) -> Result<Self> {
        let config: EvalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DevPerfError::SerializationError(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DevPerfError::ConfigError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.preset.is_some() && !self.targets.is_empty() {
            return Err(DevPerfError::ConfigError(
                "set either `preset` or `[[targets]]`, not both".to_string(),
            ));
        }
        self.target_set().map(|_| ())
    }

    /// Build the configured target set; OPV when nothing is configured.
    pub fn target_set(&self) -> Result<TargetSet> {
        if let Some(name) = &self.preset {
            return Ok(Preset::from_name(name)?.target_set());
        }
        if self.targets.is_empty() {
            return Ok(Preset::Opv.target_set());
        }
        let mut targets = Vec::with_capacity(self.targets.len());
        for t in &self.targets {
            let loss = ThresholdedMseLoss::new(t.lower, t.upper)?
                .with_out_of_range_power(t.out_of_range_power)?;
            targets.push(Target::new(t.name.clone(), loss));
        }
        TargetSet::new(targets)
    }
}
