//! Admission gate: refuses selections whose estimated size exceeds the ceiling.

use ahn_laz_core::{SelectionRequest, SizeEstimate};
use tracing::{debug, warn};

use super::error::SelectionError;
use crate::traits::SizeEstimator;

/// Compares a selection's estimated point count against a fixed ceiling.
///
/// Rejection is strictly greater-than: a selection estimated at exactly
/// `max_allowed_points` is admitted.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionGate {
    max_allowed_points: u64,
}

impl AdmissionGate {
    #[must_use]
    pub fn new(max_allowed_points: u64) -> Self {
        Self { max_allowed_points }
    }

    #[must_use]
    pub fn max_allowed_points(&self) -> u64 {
        self.max_allowed_points
    }

    /// Estimates `request` once and decides whether it may become a job.
    ///
    /// Returns the estimate on admission so callers can report it.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::EstimationFailed`] if the estimator errors.
    /// - [`SelectionError::TooManyPoints`] if the estimate exceeds the ceiling.
    pub async fn admit(
        &self,
        estimator: &dyn SizeEstimator,
        request: &SelectionRequest,
    ) -> Result<SizeEstimate, SelectionError> {
        let estimate = estimator
            .estimate(request)
            .await
            .map_err(SelectionError::EstimationFailed)?;

        if estimate.exceeds(self.max_allowed_points) {
            warn!(
                points = estimate.approximate_point_count,
                max_allowed_points = self.max_allowed_points,
                recommended_level = estimate.recommended_level,
                "selection rejected"
            );
            return Err(SelectionError::TooManyPoints {
                estimate,
                max_allowed_points: self.max_allowed_points,
            });
        }

        debug!(
            points = estimate.approximate_point_count,
            max_allowed_points = self.max_allowed_points,
            "selection admitted"
        );
        Ok(estimate)
    }
}
