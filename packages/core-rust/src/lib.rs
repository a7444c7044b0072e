//! AHN LAZ core: selection requests, size estimates, and slicer job descriptions.

pub mod decimal;
pub mod job;
pub mod selection;
pub mod size;

pub use decimal::canonical_decimal;
pub use job::{JobDescription, JobHandle};
pub use selection::{Axis, SelectionRequest, ValidationError};
pub use size::SizeEstimate;
