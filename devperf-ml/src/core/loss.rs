//! # Thresholded Loss
//!
//! Squared-error loss that classifies every prediction against a physically
//! plausible range `(lower, upper)` and counts it as correct when its
//! relative error stays within [`ACCURACY_TOLERANCE`].
//!
//! | Region | Condition | Penalty |
//! |--------|-----------|---------|
//! | `BelowLower` | `x <= lower` | `(x - y)²` raised to `out_of_range_power` |
//! | `AboveUpper` | `x >= upper` | `(x - y)²` raised to `out_of_range_power` |
//! | `Interior` | otherwise | `(x - y)²` |
//!
//! `out_of_range_power` defaults to 1, so every region gets the same flat
//! squared error. A harsher out-of-range penalty is not implemented.

use serde::{Deserialize, Serialize};

use crate::error::{DevPerfError, Result};

/// Maximum relative error magnitude counted as a correct prediction.
pub const ACCURACY_TOLERANCE: f64 = 0.1;

/// Plausible range of a predicted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Thresholds {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(DevPerfError::InvalidThresholds { lower, upper });
        }
        Ok(Self { lower, upper })
    }
}

/// Where a prediction falls relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    BelowLower,
    AboveUpper,
    Interior,
}

impl Region {
    pub fn is_out_of_range(self) -> bool {
        !matches!(self, Region::Interior)
    }
}

/// Score of a single prediction/reference pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementOutcome {
    pub penalty: f64,
    pub is_correct: bool,
    pub region: Region,
    pub relative_error: f64,
}

/// Aggregate score of one call over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossOutput {
    pub mean_penalty: f64,
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    pub out_of_range: usize,
}

/// Relative error `(prediction - reference) / reference`.
pub fn relative_error(prediction: f64, reference: f64, index: usize) -> Result<f64> {
    if reference == 0.0 {
        return Err(DevPerfError::ZeroReference { index });
    }
    Ok((prediction - reference) / reference)
}

/// True when `|(prediction - reference) / reference| <= 0.1`.
pub fn is_correct(prediction: f64, reference: f64) -> Result<bool> {
    Ok(relative_error(prediction, reference, 0)?.abs() <= ACCURACY_TOLERANCE)
}

/// Thresholded mean-squared-error loss.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdedMseLoss {
    thresholds: Thresholds,
    out_of_range_power: i32,
}

impl ThresholdedMseLoss {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        Ok(Self::from_thresholds(Thresholds::new(lower, upper)?))
    }

    pub fn from_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            out_of_range_power: 1,
        }
    }

    /// Power applied to the squared error outside the plausible range.
    pub fn with_out_of_range_power(mut self, power: u32) -> Result<Self> {
        let exponent = i32::try_from(power)
            .ok()
            .filter(|&p| p >= 1)
            .ok_or_else(|| {
                DevPerfError::InvalidInput(format!(
                    "out-of-range power must be between 1 and {}, got {power}",
                    i32::MAX
                ))
            })?;
        self.out_of_range_power = exponent;
        Ok(self)
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn lower(&self) -> f64 {
        self.thresholds.lower
    }

    pub fn upper(&self) -> f64 {
        self.thresholds.upper
    }

    pub fn out_of_range_power(&self) -> u32 {
        self.out_of_range_power.unsigned_abs()
    }

    pub fn classify(&self, prediction: f64) -> Region {
        if prediction <= self.thresholds.lower {
            Region::BelowLower
        } else if prediction >= self.thresholds.upper {
            Region::AboveUpper
        } else {
            Region::Interior
        }
    }

    /// Score one pair; `index` is only used in error reports.
    pub fn evaluate_element(
        &self,
        prediction: f64,
        reference: f64,
        index: usize,
    ) -> Result<ElementOutcome> {
        if !prediction.is_finite() || !reference.is_finite() {
            return Err(DevPerfError::InvalidInput(format!(
                "non-finite value at index {index}"
            )));
        }

        let region = self.classify(prediction);
        let error = prediction - reference;
        let relative_error = relative_error(prediction, reference, index)?;
        let squared = error * error;

        let penalty = if region.is_out_of_range() {
            squared.powi(self.out_of_range_power)
        } else {
            squared
        };
        if !penalty.is_finite() {
            return Err(DevPerfError::InvalidInput(format!(
                "penalty overflows at index {index}"
            )));
        }

        Ok(ElementOutcome {
            penalty,
            is_correct: relative_error.abs() <= ACCURACY_TOLERANCE,
            region,
            relative_error,
        })
    }

    /// Score a batch of predictions against references.
    pub fn score(&self, predictions: &[f64], references: &[f64]) -> Result<LossOutput> {
        if predictions.len() != references.len() {
            return Err(DevPerfError::LengthMismatch {
                expected: predictions.len(),
                actual: references.len(),
            });
        }
        if predictions.is_empty() {
            return Err(DevPerfError::InvalidInput(
                "cannot score an empty batch".to_string(),
            ));
        }

        let mut penalty_sum = 0.0;
        let mut correct = 0usize;
        let mut out_of_range = 0usize;

        for (index, (&x, &y)) in predictions.iter().zip(references).enumerate() {
            let outcome = self.evaluate_element(x, y, index)?;
            penalty_sum += outcome.penalty;
            if outcome.is_correct {
                correct += 1;
            }
            if outcome.region.is_out_of_range() {
                out_of_range += 1;
            }
        }

        let total = predictions.len();
        Ok(LossOutput {
            mean_penalty: penalty_sum / total as f64,
            accuracy: correct as f64 / total as f64,
            correct,
            total,
            out_of_range,
        })
    }

    /// `(mean_penalty, accuracy)` pair.
    pub fn forward(&self, predictions: &[f64], references: &[f64]) -> Result<(f64, f64)> {
        let out = self.score(predictions, references)?;
        Ok((out.mean_penalty, out.accuracy))
    }
}
