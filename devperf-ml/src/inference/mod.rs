//! # Inference
//!
//! The model seam: anything that maps a batch of input rows to one output
//! sequence per prediction head, plus the execution context and device it
//! runs under.

pub mod context;
pub mod device;

pub use context::{ExecutionContext, NoGradGuard};
pub use device::{Device, DeviceRequest, accelerator_available};

use crate::error::{DevPerfError, Result};

/// Training vs inference mode of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Training,
    Inference,
}

/// Model trait
///
/// `forward` returns `outputs[head][item]`: one sequence per head, each as
/// long as the batch.
pub trait Model {
    fn mode(&self) -> Mode;
    fn set_mode(&mut self, mode: Mode);
    fn forward(&mut self, inputs: &[Vec<f64>], ctx: &ExecutionContext) -> Result<Vec<Vec<f64>>>;
    fn name(&self) -> &str {
        "model"
    }
}

/// Model whose inputs already hold its predictions: column `i` of every
/// input row is the output of head `i`.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedModel {
    heads: usize,
    mode: Mode,
}

impl PrecomputedModel {
    pub fn new(heads: usize) -> Self {
        Self {
            heads,
            mode: Mode::Training,
        }
    }

    pub fn heads(&self) -> usize {
        self.heads
    }
}

impl Model for PrecomputedModel {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, inputs: &[Vec<f64>], _ctx: &ExecutionContext) -> Result<Vec<Vec<f64>>> {
        let mut outputs = vec![Vec::with_capacity(inputs.len()); self.heads];
        for (row_idx, row) in inputs.iter().enumerate() {
            if row.len() < self.heads {
                return Err(DevPerfError::ModelError(format!(
                    "row {row_idx} has {} columns, expected at least {}",
                    row.len(),
                    self.heads
                )));
            }
            for (head, out) in outputs.iter_mut().enumerate() {
                out.push(row[head]);
            }
        }
        Ok(outputs)
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precomputed_forward() {
        let mut model = PrecomputedModel::new(2);
        let ctx = ExecutionContext::cpu();
        let inputs = vec![vec![1.0, 2.0, 9.0], vec![3.0, 4.0, 9.0]];
        let outputs = model.forward(&inputs, &ctx).unwrap();
        assert_eq!(outputs, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_precomputed_short_row() {
        let mut model = PrecomputedModel::new(3);
        let ctx = ExecutionContext::cpu();
        let err = model.forward(&[vec![1.0]], &ctx).unwrap_err();
        assert!(matches!(err, DevPerfError::ModelError(_)));
    }

    #[test]
    fn test_mode_switch() {
        let mut model = PrecomputedModel::new(1);
        assert_eq!(model.mode(), Mode::Training);
        model.set_mode(Mode::Inference);
        assert_eq!(model.mode(), Mode::Inference);
    }
}
