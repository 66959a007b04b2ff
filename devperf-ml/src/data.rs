//! # Dataset and Batches
//!
//! Held-out samples loaded from JSON and split into fixed-size batches.
//! Labels inside a [`Batch`] are stored per target, so `labels[t]` lines up
//! with the model's output for head `t`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DevPerfError, Result};
use crate::inference::Device;

/// One held-out sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub labels: Vec<f64>,
}

/// Ordered collection of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check every sample carries one label per target.
    pub fn validate(&self, n_targets: usize) -> Result<()> {
        for (idx, sample) in self.samples.iter().enumerate() {
            if sample.labels.len() != n_targets {
                return Err(DevPerfError::InvalidInput(format!(
                    "sample {idx} has {} labels, expected {n_targets}",
                    sample.labels.len()
                )));
            }
        }
        Ok(())
    }

    /// Fresh pass over the dataset; the last batch may be short.
    pub fn batches(&self, batch_size: usize) -> Result<Batches<'_>> {
        if batch_size == 0 {
            return Err(DevPerfError::InvalidInput(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(Batches {
            chunks: self.samples.chunks(batch_size),
        })
    }
}

/// Batch of input rows and per-target label sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: Vec<Vec<f64>>,
    pub labels: Vec<Vec<f64>>,
    pub device: Device,
}

impl Batch {
    pub fn new(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Self {
        Self {
            inputs,
            labels,
            device: Device::Cpu,
        }
    }

    /// Build from samples, transposing labels to per-target order.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let n_targets = samples.first().map(|s| s.labels.len()).unwrap_or(0);
        let mut labels = vec![Vec::with_capacity(samples.len()); n_targets];
        for sample in samples {
            for (target, column) in labels.iter_mut().enumerate() {
                if let Some(&value) = sample.labels.get(target) {
                    column.push(value);
                }
            }
        }
        Self::new(samples.iter().map(|s| s.inputs.clone()).collect(), labels)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn to_device(mut self, device: Device) -> Self {
        if self.device != device {
            tracing::trace!(from = %self.device, to = %device, "moving batch");
            self.device = device;
        }
        self
    }
}

/// Iterator returned by [`Dataset::batches`].
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    chunks: std::slice::Chunks<'a, Sample>,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(Batch::from_samples)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}
