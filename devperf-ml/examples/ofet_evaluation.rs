//! Example: evaluating an OFET model with the thresholded loss
//!
//! Demonstrates:
//! 1. Scoring one head with `ThresholdedMseLoss`
//! 2. Implementing `Model` for a custom predictor
//! 3. Running one epoch over a dataset and printing the report

use devperf_ml::prelude::*;
use devperf_ml::report;

/// Predicts every head as a fixed fraction of the first input feature.
struct ScaledFeatureModel {
    mode: Mode,
    scales: [f64; 4],
}

impl Model for ScaledFeatureModel {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, inputs: &[Vec<f64>], _ctx: &ExecutionContext) -> Result<Vec<Vec<f64>>> {
        Ok(self
            .scales
            .iter()
            .map(|scale| inputs.iter().map(|row| row[0] * scale).collect())
            .collect())
    }

    fn name(&self) -> &str {
        "scaled-feature"
    }
}

fn main() -> Result<()> {
    println!("1. Scoring a single head:");
    let loss = ThresholdedMseLoss::new(0.0, 1.5)?;
    let out = loss.score(&[0.2, 1.8, -0.1], &[0.25, 1.7, 0.1])?;
    println!(
        "   mean penalty = {:.6}, accuracy = {:.3}, out of range = {}",
        out.mean_penalty, out.accuracy, out.out_of_range
    );
    println!();

    println!("2. Epoch evaluation (OFET heads):");
    let dataset = Dataset::new(
        (1..=12)
            .map(|i| {
                let x = i as f64 / 10.0;
                Sample {
                    inputs: vec![x],
                    labels: vec![x * 0.5, x * 0.9, x * 1.1, x * 0.3],
                }
            })
            .collect(),
    );
    let mut model = ScaledFeatureModel {
        mode: Mode::Training,
        scales: [0.5, 1.0, 1.0, 0.25],
    };
    let ctx = ExecutionContext::new(DeviceRequest::Auto.resolve());
    let summary = evaluate(&mut model, dataset.batches(4)?, &TargetSet::ofet(), &ctx)?;
    print!("{}", report::render_text(&summary));

    Ok(())
}
