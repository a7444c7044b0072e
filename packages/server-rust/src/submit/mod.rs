//! Job submitter backends.
//!
//! - [`local`]: spawn the slicer on this host
//! - [`http`]: hand the job to a remote job service
//! - [`memory`]: record jobs without running them

pub mod http;
pub mod local;
pub mod memory;

pub use http::HttpJobSubmitter;
pub use local::LocalProcessSubmitter;
pub use memory::RecordingSubmitter;
