use ahn_laz_core::SizeEstimate;

/// Terminal failures of a single selection submission.
///
/// None of these are retried internally; when estimation or submission fails
/// nothing downstream of the failing step has run.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(
        "selection too large: estimated {} points exceeds the maximum of {max_allowed_points}",
        estimate.approximate_point_count
    )]
    TooManyPoints {
        estimate: SizeEstimate,
        max_allowed_points: u64,
    },
    #[error("size estimation failed: {0}")]
    EstimationFailed(#[source] anyhow::Error),
    #[error("job submission failed: {0}")]
    SubmissionFailed(#[source] anyhow::Error),
    #[error("server overloaded, try again later")]
    Overloaded,
}

impl SelectionError {
    /// Short, stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TooManyPoints { .. } => "too_many_points",
            Self::EstimationFailed(_) => "estimation_failed",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::Overloaded => "overloaded",
        }
    }

    /// Whether the same request may succeed if sent again unchanged.
    ///
    /// Only load shedding is known to be transient here; backend errors are
    /// classified by whoever owns the backend.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Overloaded)
    }
}
