//! Selection submission: estimate, admit, build, submit.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use ahn_laz_core::{JobDescription, JobHandle, SelectionRequest, SizeEstimate};
use tower::Service;
use tracing::{error, info};

use super::admission::AdmissionGate;
use super::config::SubmissionConfig;
use super::error::SelectionError;
use crate::traits::{JobSubmitter, SizeEstimator};

/// Sole entry point for turning a selection into a slicer job.
///
/// Stateless between calls: every call estimates, gates, builds, and submits
/// from scratch, and nothing is cached. Cloning is cheap; clones share the
/// same collaborators.
#[derive(Clone)]
pub struct SelectionService {
    estimator: Arc<dyn SizeEstimator>,
    submitter: Arc<dyn JobSubmitter>,
    gate: AdmissionGate,
    executable_path: Arc<str>,
}

impl SelectionService {
    #[must_use]
    pub fn new(
        estimator: Arc<dyn SizeEstimator>,
        submitter: Arc<dyn JobSubmitter>,
        config: &SubmissionConfig,
    ) -> Self {
        Self {
            estimator,
            submitter,
            gate: AdmissionGate::new(config.max_allowed_points),
            executable_path: Arc::from(config.executable_path.as_str()),
        }
    }

    /// Estimates a selection without admitting or submitting it.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EstimationFailed`] if the estimator errors.
    pub async fn estimate(&self, request: &SelectionRequest) -> Result<SizeEstimate, SelectionError> {
        self.estimator
            .estimate(request)
            .await
            .map_err(SelectionError::EstimationFailed)
    }

    /// Admits `request` and submits the slicer job for it.
    ///
    /// The same request value is used for the admission decision and for the
    /// job arguments. The request's own level is forwarded even when the
    /// estimator recommends another one. No step is retried.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::EstimationFailed`]: estimator errored; nothing was built.
    /// - [`SelectionError::TooManyPoints`]: over the ceiling; nothing was built.
    /// - [`SelectionError::SubmissionFailed`]: the backend refused the job.
    pub async fn submit_selection(
        &self,
        request: SelectionRequest,
    ) -> Result<JobHandle, SelectionError> {
        let estimate = self.gate.admit(self.estimator.as_ref(), &request).await?;

        let job = JobDescription::for_selection(&*self.executable_path, &request);
        let backend = self.submitter.backend_name();
        info!(
            backend,
            points = estimate.approximate_point_count,
            level = request.level(),
            command = %job.command_line(),
            "submitting slicer job"
        );

        let handle = self.submitter.submit(job).await.map_err(|e| {
            error!(backend, error = %e, "slicer job submission failed");
            SelectionError::SubmissionFailed(e)
        })?;

        info!(backend, job_id = %handle, "slicer job submitted");
        Ok(handle)
    }
}

impl std::fmt::Debug for SelectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionService")
            .field("gate", &self.gate)
            .field("executable_path", &self.executable_path)
            .field("backend", &self.submitter.backend_name())
            .finish_non_exhaustive()
    }
}

impl Service<SelectionRequest> for SelectionService {
    type Response = JobHandle;
    type Error = SelectionError;
    type Future = Pin<Box<dyn Future<Output = Result<JobHandle, SelectionError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: SelectionRequest) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { service.submit_selection(request).await })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
