use ahn_laz_core::{JobDescription, JobHandle, SelectionRequest, SizeEstimate};
use async_trait::async_trait;

/// Approximates the size of a selection from spatial metadata, without
/// extracting any points.
/// Implementations: analytic density model, database-backed store (external).
///
/// Calls must be idempotent and free of side effects; the orchestrator never
/// retries them.
#[async_trait]
pub trait SizeEstimator: Send + Sync {
    /// Estimate the number of points `request` would yield.
    async fn estimate(&self, request: &SelectionRequest) -> anyhow::Result<SizeEstimate>;
}

/// Hands a slicer job to an execution backend.
/// Implementations: local process, remote HTTP job service, in-memory recorder.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submit a job. Ownership of the description moves to the backend.
    async fn submit(&self, job: JobDescription) -> anyhow::Result<JobHandle>;

    /// Short backend name used in logs and metrics labels.
    fn backend_name(&self) -> &'static str;
}
