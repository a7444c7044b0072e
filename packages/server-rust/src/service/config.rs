/// Slicer executable used when none is configured.
pub const DEFAULT_EXECUTABLE_PATH: &str = "/usr/bin/ahn-laz-slicer";

/// Configuration consumed by the selection submission path.
///
/// Controls which slicer is invoked, the admission ceiling, and the
/// concurrency limit of the operation pipeline.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Absolute path of the slicer executable placed in every job.
    pub executable_path: String,
    /// Admission ceiling: selections estimated above this many points are rejected.
    pub max_allowed_points: u64,
    /// Maximum number of submissions in flight before load shedding.
    pub max_concurrent_submissions: u32,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            executable_path: DEFAULT_EXECUTABLE_PATH.to_string(),
            max_allowed_points: 10_000_000,
            max_concurrent_submissions: 64,
        }
    }
}
