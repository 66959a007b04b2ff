//! # Epoch Evaluation
//!
//! One pass of a model over a held-out batch source. Every head is scored
//! with its own [`ThresholdedMseLoss`](crate::core::loss::ThresholdedMseLoss);
//! per-batch values are averaged over the number of batches.

pub mod targets;

pub use targets::{OFET_TARGETS, OPV_TARGETS, Preset, Target, TargetSet};

use serde::Serialize;

use crate::core::stats::{EpochAccumulator, mape};
use crate::data::Batch;
use crate::error::{DevPerfError, Result};
use crate::inference::{ExecutionContext, Mode, Model};

/// Epoch means for one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub loss: f64,
    pub accuracy: f64,
    pub mape: f64,
}

/// Epoch means for a full pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochSummary {
    pub total_loss: f64,
    pub batches: usize,
    pub samples: usize,
    pub targets: Vec<TargetSummary>,
}

impl EpochSummary {
    /// `total, loss_1..loss_n, accuracy_1..accuracy_n`
    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(1 + 2 * self.targets.len());
        out.push(self.total_loss);
        out.extend(self.targets.iter().map(|t| t.loss));
        out.extend(self.targets.iter().map(|t| t.accuracy));
        out
    }

    pub fn target(&self, name: &str) -> Option<&TargetSummary> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct TargetAccumulator {
    loss: EpochAccumulator,
    accuracy: EpochAccumulator,
    mape: EpochAccumulator,
}

/// Run one evaluation pass.
///
/// The model is switched to inference mode and gradient tracking is disabled
/// on `ctx` for the whole pass; the previous gradient mode is restored on
/// return, including on error.
pub fn evaluate<M, I>(
    model: &mut M,
    batches: I,
    targets: &TargetSet,
    ctx: &ExecutionContext,
) -> Result<EpochSummary>
where
    M: Model + ?Sized,
    I: IntoIterator<Item = Batch>,
{
    model.set_mode(Mode::Inference);
    let _no_grad = ctx.no_grad();

    let mut total = EpochAccumulator::new();
    let mut per_target = vec![TargetAccumulator::default(); targets.len()];
    let mut samples = 0usize;

    for (batch_idx, batch) in batches.into_iter().enumerate() {
        let batch = batch.to_device(ctx.device());
        let outputs = model.forward(&batch.inputs, ctx)?;

        if outputs.len() != targets.len() {
            return Err(DevPerfError::TargetArity {
                expected: targets.len(),
                actual: outputs.len(),
            });
        }
        if batch.labels.len() != targets.len() {
            return Err(DevPerfError::TargetArity {
                expected: targets.len(),
                actual: batch.labels.len(),
            });
        }

        let mut batch_loss = 0.0;
        for ((target, acc), (output, labels)) in targets
            .iter()
            .zip(per_target.iter_mut())
            .zip(outputs.iter().zip(&batch.labels))
        {
            let scored = target.loss.score(output, labels)?;
            batch_loss += scored.mean_penalty;
            acc.loss.record(scored.mean_penalty);
            acc.accuracy.record(scored.accuracy);
            acc.mape.record(mape(output, labels)?);
        }

        total.record(batch_loss);
        samples += batch.len();
        tracing::debug!(
            batch = batch_idx,
            size = batch.len(),
            loss = batch_loss,
            "evaluated batch"
        );
    }

    if total.batches() == 0 {
        return Err(DevPerfError::EmptyBatchSource);
    }

    let mut summaries = Vec::with_capacity(targets.len());
    for (target, acc) in targets.iter().zip(per_target) {
        summaries.push(TargetSummary {
            name: target.name.clone(),
            loss: acc.loss.mean()?,
            accuracy: acc.accuracy.mean()?,
            mape: acc.mape.mean()?,
        });
    }

    let summary = EpochSummary {
        total_loss: total.mean()?,
        batches: total.batches(),
        samples,
        targets: summaries,
    };

    tracing::info!(
        model = model.name(),
        batches = summary.batches,
        total_loss = summary.total_loss,
        "epoch evaluation complete"
    );
    for t in &summary.targets {
        tracing::info!(
            name = %t.name,
            loss = t.loss,
            accuracy = t.accuracy,
            mape = t.mape,
            "target summary"
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loss::ThresholdedMseLoss;
    use crate::inference::PrecomputedModel;

    fn batch(preds: &[[f64; 2]], rows: &[[f64; 2]]) -> Batch {
        let inputs = preds.iter().map(|p| p.to_vec()).collect();
        let labels = (0..2)
            .map(|t| rows.iter().map(|l| l[t]).collect::<Vec<f64>>())
            .collect();
        Batch::new(inputs, labels)
    }

    fn two_targets() -> TargetSet {
        let loss = ThresholdedMseLoss::new(-5.0, 1.5).unwrap();
        TargetSet::new(vec![Target::new("a", loss.clone()), Target::new("b", loss)]).unwrap()
    }

    #[test]
    fn test_empty_batch_source() {
        let mut model = PrecomputedModel::new(2);
        let ctx = ExecutionContext::cpu();
        let err = evaluate(&mut model, Vec::<Batch>::new(), &two_targets(), &ctx).unwrap_err();
        assert_eq!(err, DevPerfError::EmptyBatchSource);
        assert!(ctx.grad_enabled());
    }

    #[test]
    fn test_single_batch_values() {
        let mut model = PrecomputedModel::new(2);
        let ctx = ExecutionContext::cpu();
        let b = batch(&[[1.0, 2.0], [1.0, 4.0]], &[[1.0, 2.0], [2.0, 2.0]]);
        let summary = evaluate(&mut model, vec![b], &two_targets(), &ctx).unwrap();

        // a: penalties [0, 1] -> 0.5, b: penalties [0, 4] -> 2.0
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.samples, 2);
        assert!((summary.targets[0].loss - 0.5).abs() < 1e-12);
        assert!((summary.targets[1].loss - 2.0).abs() < 1e-12);
        assert!((summary.total_loss - 2.5).abs() < 1e-12);
        assert_eq!(summary.targets[0].accuracy, 0.5);
        assert_eq!(summary.targets[1].accuracy, 0.5);
        assert_eq!(summary.values().len(), 5);
        assert_eq!(model.mode(), Mode::Inference);
    }

    #[test]
    fn test_identical_batches_average_to_single() {
        let b = batch(&[[1.1, 2.0], [0.5, 3.0]], &[[1.0, 2.5], [0.4, 3.0]]);
        let targets = two_targets();
        let ctx = ExecutionContext::cpu();

        let mut model = PrecomputedModel::new(2);
        let one = evaluate(&mut model, vec![b.clone()], &targets, &ctx).unwrap();
        let many = evaluate(&mut model, vec![b.clone(), b.clone(), b], &targets, &ctx).unwrap();

        assert_eq!(many.batches, 3);
        for (x, y) in one.values().iter().zip(many.values()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_target_arity_mismatch() {
        let mut model = PrecomputedModel::new(1);
        let ctx = ExecutionContext::cpu();
        let b = batch(&[[1.0, 2.0]], &[[1.0, 2.0]]);
        let err = evaluate(&mut model, vec![b], &two_targets(), &ctx).unwrap_err();
        assert_eq!(err, DevPerfError::TargetArity { expected: 2, actual: 1 });
        assert!(ctx.grad_enabled());
    }

    #[test]
    fn test_zero_label_aborts_pass() {
        let mut model = PrecomputedModel::new(2);
        let ctx = ExecutionContext::cpu();
        let b = batch(&[[1.0, 2.0]], &[[0.0, 2.0]]);
        let err = evaluate(&mut model, vec![b], &two_targets(), &ctx).unwrap_err();
        assert_eq!(err, DevPerfError::ZeroReference { index: 0 });
    }

    struct GradProbe {
        mode: Mode,
        saw_grad: Vec<bool>,
    }

    impl Model for GradProbe {
        fn mode(&self) -> Mode {
            self.mode
        }

        fn set_mode(&mut self, mode: Mode) {
            self.mode = mode;
        }

        fn forward(&mut self, inputs: &[Vec<f64>], ctx: &ExecutionContext) -> Result<Vec<Vec<f64>>> {
            self.saw_grad.push(ctx.grad_enabled());
            Ok(vec![inputs.iter().map(|row| row[0]).collect()])
        }
    }

    #[test]
    fn test_gradients_disabled_during_pass() {
        let mut model = GradProbe {
            mode: Mode::Training,
            saw_grad: Vec::new(),
        };
        let ctx = ExecutionContext::cpu();
        let targets = TargetSet::single("loss", ThresholdedMseLoss::new(0.0, 1.5).unwrap());
        let batches = vec![
            Batch::new(vec![vec![1.0]], vec![vec![1.0]]),
            Batch::new(vec![vec![0.5]], vec![vec![0.5]]),
        ];

        let summary = evaluate(&mut model, batches, &targets, &ctx).unwrap();
        assert_eq!(model.saw_grad, vec![false, false]);
        assert!(ctx.grad_enabled());
        assert_eq!(summary.total_loss, 0.0);
        assert_eq!(summary.targets[0].accuracy, 1.0);
    }
}
