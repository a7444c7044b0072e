//! Size estimator implementations.

pub mod density;

pub use density::{DensitySizeEstimator, EstimatorConfig, Extent};
