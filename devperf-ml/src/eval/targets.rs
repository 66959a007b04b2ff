//! Named prediction targets and their scorers.

use serde::Serialize;

use crate::core::loss::{Thresholds, ThresholdedMseLoss};
use crate::error::{DevPerfError, Result};

/// Plausible range shared by the OPV heads.
pub const OPV_THRESHOLDS: Thresholds = Thresholds {
    lower: -5.0,
    upper: 1.5,
};

/// Plausible range shared by the OFET heads.
pub const OFET_THRESHOLDS: Thresholds = Thresholds {
    lower: 0.0,
    upper: 1.5,
};

pub const OPV_TARGETS: [&str; 4] = ["PCE", "Voc", "Jsc", "FF"];
pub const OFET_TARGETS: [&str; 4] = ["mu", "r", "on_off", "Vt"];

/// One model head: label name plus its scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub loss: ThresholdedMseLoss,
}

impl Target {
    pub fn new(name: impl Into<String>, loss: ThresholdedMseLoss) -> Self {
        Self {
            name: name.into(),
            loss,
        }
    }
}

/// Ordered, non-empty set of targets with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSet {
    targets: Vec<Target>,
}

/// Built-in target sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Preset {
    Opv,
    Ofet,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Opv, Preset::Ofet]
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Opv => "opv",
            Preset::Ofet => "ofet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Opv => "organic photovoltaic devices",
            Preset::Ofet => "organic field-effect transistors",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "opv" => Ok(Preset::Opv),
            "ofet" => Ok(Preset::Ofet),
            other => Err(DevPerfError::ConfigError(format!(
                "unknown preset '{other}' (use opv|ofet)"
            ))),
        }
    }

    pub fn target_set(self) -> TargetSet {
        match self {
            Preset::Opv => TargetSet::opv(),
            Preset::Ofet => TargetSet::ofet(),
        }
    }
}

impl TargetSet {
    pub fn new(targets: Vec<Target>) -> Result<Self> {
        if targets.is_empty() {
            return Err(DevPerfError::InvalidInput(
                "target set must contain at least one target".to_string(),
            ));
        }
        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|t| t.name == target.name) {
                return Err(DevPerfError::InvalidInput(format!(
                    "duplicate target name '{}'",
                    target.name
                )));
            }
        }
        Ok(Self { targets })
    }

    pub fn single(name: impl Into<String>, loss: ThresholdedMseLoss) -> Self {
        Self {
            targets: vec![Target::new(name, loss)],
        }
    }

    fn uniform(names: &[&str], thresholds: Thresholds) -> Self {
        Self {
            targets: names
                .iter()
                .map(|name| Target::new(*name, ThresholdedMseLoss::from_thresholds(thresholds)))
                .collect(),
        }
    }

    /// PCE, Voc, Jsc, FF with (-5, 1.5).
    pub fn opv() -> Self {
        Self::uniform(&OPV_TARGETS, OPV_THRESHOLDS)
    }

    /// mu, r, on_off, Vt with (0, 1.5).
    pub fn ofet() -> Self {
        Self::uniform(&OFET_TARGETS, OFET_THRESHOLDS)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
