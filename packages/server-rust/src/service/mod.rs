//! Selection submission pipeline.
//!
//! 1. **Admission** (`admission`): estimate the selection, refuse it above the ceiling
//! 2. **Selection** (`selection`): build the slicer job and hand it to a backend
//! 3. **Middleware** (`middleware`): Tower layers (load shedding, metrics)

pub mod admission;
pub mod config;
pub mod error;
pub mod middleware;
pub mod selection;

pub use admission::AdmissionGate;
pub use config::SubmissionConfig;
pub use error::SelectionError;
pub use middleware::{build_selection_pipeline, SelectionPipeline};
pub use selection::SelectionService;
