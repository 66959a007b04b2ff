//! # Statistics Functions
//!
//! Regression metrics over paired slices and the running accumulator used to
//! turn per-batch values into epoch means.

use crate::error::{DevPerfError, Result};

fn check_pair(predictions: &[f64], references: &[f64]) -> Result<()> {
    if predictions.len() != references.len() {
        return Err(DevPerfError::LengthMismatch {
            expected: predictions.len(),
            actual: references.len(),
        });
    }
    if predictions.is_empty() {
        return Err(DevPerfError::InvalidInput("empty input".to_string()));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(DevPerfError::InvalidInput("mean of empty slice".to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean Squared Error: (1/n) Σ (y - ŷ)²
pub fn mse(predictions: &[f64], references: &[f64]) -> Result<f64> {
    check_pair(predictions, references)?;
    let sum: f64 = predictions
        .iter()
        .zip(references)
        .map(|(p, r)| (p - r) * (p - r))
        .sum();
    Ok(sum / predictions.len() as f64)
}

/// Mean Absolute Error: (1/n) Σ |y - ŷ|
pub fn mae(predictions: &[f64], references: &[f64]) -> Result<f64> {
    check_pair(predictions, references)?;
    let sum: f64 = predictions
        .iter()
        .zip(references)
        .map(|(p, r)| (p - r).abs())
        .sum();
    Ok(sum / predictions.len() as f64)
}

/// Mean Absolute Percentage Error: (100/n) Σ |(ŷ - y) / y|
pub fn mape(predictions: &[f64], references: &[f64]) -> Result<f64> {
    check_pair(predictions, references)?;
    let mut sum = 0.0;
    for (index, (p, r)) in predictions.iter().zip(references).enumerate() {
        if *r == 0.0 {
            return Err(DevPerfError::ZeroReference { index });
        }
        sum += ((p - r) / r).abs();
    }
    Ok(sum / predictions.len() as f64 * 100.0)
}

/// Running sum of per-batch values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochAccumulator {
    sum: f64,
    batches: usize,
}

impl EpochAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.batches += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Epoch mean; fails when nothing was recorded.
    pub fn mean(self) -> Result<f64> {
        if self.batches == 0 {
            return Err(DevPerfError::EmptyBatchSource);
        }
        Ok(self.sum / self.batches as f64)
    }
}
