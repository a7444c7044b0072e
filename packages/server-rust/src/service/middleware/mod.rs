//! Tower middleware layers for the selection pipeline.
//!
//! - [`load_shed`]: Semaphore-based concurrency limiting
//! - [`metrics`]: Submission timing and outcome counting
//! - [`pipeline`]: Composes all layers into a single service stack

pub mod load_shed;
pub mod metrics;
pub mod pipeline;

pub use load_shed::LoadShedLayer;
pub use metrics::MetricsLayer;
pub use pipeline::{build_selection_pipeline, SelectionPipeline};
