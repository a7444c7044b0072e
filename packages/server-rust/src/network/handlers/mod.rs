//! HTTP handler definitions for the LAZ selection server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for building the router.

pub mod health;
pub mod metrics;
pub mod selection;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use metrics::metrics_handler;
pub use selection::{size_handler, submit_laz_handler};

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;

use super::ShutdownController;
use crate::service::{
    build_selection_pipeline, SelectionPipeline, SelectionService, SubmissionConfig,
};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds shared handles only, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Middleware-wrapped submission path used by `POST /laz`.
    pub pipeline: SelectionPipeline,
    /// Bare service, used by `POST /size` for estimates.
    pub selections: SelectionService,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Prometheus render handle; `None` disables `GET /metrics`.
    pub metrics: Option<PrometheusHandle>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Builds state around `selections`, wrapping it in its middleware pipeline.
    #[must_use]
    pub fn new(
        selections: SelectionService,
        config: &SubmissionConfig,
        shutdown: Arc<ShutdownController>,
    ) -> Self {
        Self {
            pipeline: build_selection_pipeline(selections.clone(), config),
            selections,
            shutdown,
            metrics: None,
            start_time: Instant::now(),
        }
    }

    /// Enables `GET /metrics` with the given recorder handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::AppState;
    use crate::estimate::{DensitySizeEstimator, EstimatorConfig, Extent};
    use crate::network::ShutdownController;
    use crate::service::{SelectionService, SubmissionConfig};
    use crate::submit::RecordingSubmitter;
    use crate::traits::JobSubmitter;

    /// State over a 1000x1000 dataset of density 1 at level 10, with a
    /// ceiling of 5000 points and a recording submitter.
    pub fn test_state() -> (AppState, Arc<RecordingSubmitter>) {
        let submitter = Arc::new(RecordingSubmitter::new());
        let state = test_state_with(Arc::clone(&submitter) as Arc<dyn JobSubmitter>);
        (state, submitter)
    }

    /// Same dataset and ceiling as [`test_state`] with a caller-chosen submitter.
    pub fn test_state_with(submitter: Arc<dyn JobSubmitter>) -> AppState {
        let estimator = Arc::new(DensitySizeEstimator::new(EstimatorConfig {
            extent: Extent {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1000.0,
                max_y: 1000.0,
            },
            finest_level: 10,
            points_per_unit_area: 1.0,
            target_points: 5_000,
        }));
        let config = SubmissionConfig {
            executable_path: "/usr/bin/ahn-laz-slicer".to_string(),
            max_allowed_points: 5_000,
            max_concurrent_submissions: 4,
        };
        let service = SelectionService::new(estimator, submitter, &config);
        AppState::new(service, &config, Arc::new(ShutdownController::new()))
    }
}
