//! Pipeline composition: wraps the selection service in its middleware stack.

use ahn_laz_core::{JobHandle, SelectionRequest};
use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;

use super::load_shed::LoadShedLayer;
use super::metrics::MetricsLayer;
use crate::service::config::SubmissionConfig;
use crate::service::error::SelectionError;
use crate::service::selection::SelectionService;

/// The type-erased, cloneable selection pipeline shared by HTTP handlers.
pub type SelectionPipeline = BoxCloneSyncService<SelectionRequest, JobHandle, SelectionError>;

/// Build the selection pipeline by wrapping the `SelectionService` with middleware.
///
/// Layer order (outermost to innermost):
/// 1. `LoadShedLayer` -- reject when overloaded (fail fast before estimating)
/// 2. `MetricsLayer` -- record timing and outcome of admitted calls
///
/// No timeout layer: a submission that has started runs to completion.
#[must_use]
pub fn build_selection_pipeline(
    service: SelectionService,
    config: &SubmissionConfig,
) -> SelectionPipeline {
    let stack = ServiceBuilder::new()
        .layer(LoadShedLayer::new(config.max_concurrent_submissions))
        .layer(MetricsLayer)
        .service(service);
    BoxCloneSyncService::new(stack)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower::ServiceExt;

    use super::*;
    use crate::estimate::{DensitySizeEstimator, EstimatorConfig, Extent};
    use crate::submit::RecordingSubmitter;
    use crate::traits::JobSubmitter;

    fn estimator() -> Arc<DensitySizeEstimator> {
        Arc::new(DensitySizeEstimator::new(EstimatorConfig {
            extent: Extent {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1000.0,
                max_y: 1000.0,
            },
            finest_level: 10,
            points_per_unit_area: 1.0,
            target_points: 1_000,
        }))
    }

    #[tokio::test]
    async fn pipeline_routes_through_all_layers() {
        let submitter = Arc::new(RecordingSubmitter::new());
        let config = SubmissionConfig {
            max_allowed_points: 5_000,
            ..SubmissionConfig::default()
        };
        let service = SelectionService::new(
            estimator(),
            Arc::clone(&submitter) as Arc<dyn JobSubmitter>,
            &config,
        );
        let pipeline = build_selection_pipeline(service, &config);

        let small = SelectionRequest::new(0.0, 0.0, 50.0, 50.0, "a@b.nl", 10).unwrap();
        let handle = pipeline.clone().oneshot(small).await.unwrap();
        assert_eq!(handle.id(), "memory-1");

        let large = SelectionRequest::new(0.0, 0.0, 500.0, 500.0, "a@b.nl", 10).unwrap();
        let err = pipeline.oneshot(large).await.unwrap_err();
        assert!(matches!(err, SelectionError::TooManyPoints { .. }));
        assert_eq!(submitter.count(), 1);
    }

    #[tokio::test]
    async fn zero_concurrency_sheds_everything() {
        let submitter = Arc::new(RecordingSubmitter::new());
        let config = SubmissionConfig {
            max_concurrent_submissions: 0,
            ..SubmissionConfig::default()
        };
        let service = SelectionService::new(
            estimator(),
            Arc::clone(&submitter) as Arc<dyn JobSubmitter>,
            &config,
        );
        let pipeline = build_selection_pipeline(service, &config);

        let request = SelectionRequest::new(0.0, 0.0, 1.0, 1.0, "a@b.nl", 10).unwrap();
        let err = pipeline.oneshot(request).await.unwrap_err();
        assert!(matches!(err, SelectionError::Overloaded));
        assert_eq!(submitter.count(), 0);
    }
}
