//! # devperf-ml - Physically Informed Evaluation for Device Performance Models
//!
//! Scoring and evaluation primitives for regression heads that predict
//! organic device performance (OPV: PCE, Voc, Jsc, FF; OFET: mu, r, on_off, Vt).
//!
//! ## Modules
//!
//! - **core**: thresholded squared-error loss, regression statistics, epoch accumulation
//! - **inference**: model trait, execution context (device + gradient mode)
//! - **data**: held-out datasets and batches
//! - **eval**: one parametrized epoch evaluation loop over named targets
//! - **config**: `eval.toml` configuration
//! - **report**: text and JSON epoch reports
//!
//! ```
//! use devperf_ml::prelude::*;
//!
//! let loss = ThresholdedMseLoss::new(-5.0, 1.5).unwrap();
//! let (penalty, accuracy) = loss.forward(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
//! assert_eq!(penalty, 0.0);
//! assert_eq!(accuracy, 1.0);
//! ```

pub mod error;
pub use error::{DevPerfError, Result};

pub mod core;
pub use crate::core::prelude::*;

pub mod config;
pub mod data;
pub mod eval;
pub mod inference;
pub mod report;

pub use config::{EvalConfig, TargetConfig};
pub use data::{Batch, Batches, Dataset, Sample};
pub use eval::{EpochSummary, Preset, Target, TargetSet, TargetSummary, evaluate};
pub use inference::{Device, DeviceRequest, ExecutionContext, Mode, Model, PrecomputedModel};

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::config::EvalConfig;
    pub use crate::core::prelude::*;
    pub use crate::data::{Batch, Dataset, Sample};
    pub use crate::error::{DevPerfError, Result};
    pub use crate::eval::{EpochSummary, Preset, Target, TargetSet, TargetSummary, evaluate};
    pub use crate::inference::{
        Device, DeviceRequest, ExecutionContext, Mode, Model, PrecomputedModel,
    };
}
