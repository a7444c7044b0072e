//! Metrics middleware for selection submissions.
//!
//! Records each call in a `tracing` span and in the `metrics` recorder
//! (counter by outcome plus a duration histogram).

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use ahn_laz_core::{JobHandle, SelectionRequest};
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::error::SelectionError;
use crate::telemetry::{SELECTIONS_TOTAL, SELECTION_DURATION};

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments submissions with timing and outcome counts.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records submission duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

/// Metric label for a submission result.
fn outcome_label(result: &Result<JobHandle, SelectionError>) -> &'static str {
    match result {
        Ok(_) => "submitted",
        Err(e) => e.kind(),
    }
}

impl<S> Service<SelectionRequest> for MetricsService<S>
where
    S: Service<SelectionRequest, Response = JobHandle, Error = SelectionError> + Send,
    S::Future: Send + 'static,
{
    type Response = JobHandle;
    type Error = SelectionError;
    type Future = Pin<Box<dyn Future<Output = Result<JobHandle, SelectionError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: SelectionRequest) -> Self::Future {
        let span = info_span!(
            "selection",
            level = request.level(),
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(request);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let elapsed = start.elapsed();
                let outcome = outcome_label(&result);

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                metrics::counter!(SELECTIONS_TOTAL, "outcome" => outcome).increment(1);
                metrics::histogram!(SELECTION_DURATION, "outcome" => outcome)
                    .record(elapsed.as_secs_f64());

                tracing::info!(duration_ms, outcome, "selection complete");
                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
