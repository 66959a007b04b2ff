//! # Core ML Primitives
//!
//! - Thresholded loss (physically informed squared error)
//! - Regression statistics and epoch accumulation

pub mod loss;
pub mod stats;

pub use loss::*;
pub use stats::*;

/// Prelude module for core exports
pub mod prelude {
    pub use crate::core::loss::*;
    pub use crate::core::stats::*;
}
