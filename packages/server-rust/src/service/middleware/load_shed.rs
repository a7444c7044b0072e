//! Load-shedding middleware for selection submissions.
//!
//! Rejects submissions when more than `max_concurrent_submissions` are already
//! in flight, with `SelectionError::Overloaded`. Admitted work is never
//! cancelled.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use ahn_laz_core::{JobHandle, SelectionRequest};
use tokio::sync::Semaphore;
use tower::{Layer, Service};

use crate::service::error::SelectionError;

// ---------------------------------------------------------------------------
// LoadShedLayer
// ---------------------------------------------------------------------------

/// Tower layer that limits concurrent submissions via a semaphore.
///
/// When all permits are taken, incoming selections are rejected immediately
/// rather than queued.
#[derive(Debug, Clone)]
pub struct LoadShedLayer {
    semaphore: Arc<Semaphore>,
}

impl LoadShedLayer {
    /// Create a new `LoadShedLayer` with the given concurrency limit.
    #[must_use]
    pub fn new(max_concurrent: u32) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
        }
    }
}

impl<S> Layer<S> for LoadShedLayer {
    type Service = LoadShedService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoadShedService {
            inner,
            semaphore: Arc::clone(&self.semaphore),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadShedService
// ---------------------------------------------------------------------------

/// Service wrapper that enforces the concurrency limit.
#[derive(Debug, Clone)]
pub struct LoadShedService<S> {
    inner: S,
    semaphore: Arc<Semaphore>,
}

impl<S> Service<SelectionRequest> for LoadShedService<S>
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
        let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() else {
            tracing::warn!("selection shed: too many submissions in flight");
            return Box::pin(async { Err(SelectionError::Overloaded) });
        };

        let fut = self.inner.call(request);
        Box::pin(async move {
            let result = fut.await;
            drop(permit);
            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tower::ServiceExt;

    use super::*;

    /// Service that holds for a configurable duration before handing out a job.
    #[derive(Clone)]
    struct SlowService {
        delay_ms: u64,
    }

    impl Service<SelectionRequest> for SlowService {
        type Response = JobHandle;
        type Error = SelectionError;
        type Future = Pin<Box<dyn Future<Output = Result<JobHandle, SelectionError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _request: SelectionRequest) -> Self::Future {
            let delay = self.delay_ms;
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(JobHandle::new("slow"))
            })
        }
    }

    fn request() -> SelectionRequest {
        SelectionRequest::new(0.0, 0.0, 1.0, 1.0, "a@b.nl", 1).unwrap()
    }

    #[tokio::test]
    async fn allows_submissions_under_limit() {
        let svc = LoadShedLayer::new(10).layer(SlowService { delay_ms: 1 });
        let handle = svc.oneshot(request()).await.unwrap();
        assert_eq!(handle.id(), "slow");
    }

    #[tokio::test]
    async fn rejects_when_overloaded() {
        let mut svc = LoadShedLayer::new(1).layer(SlowService { delay_ms: 500 });

        let _ = ServiceExt::ready(&mut svc).await.unwrap();
        let _in_flight = tokio::spawn(svc.call(request()));

        tokio::time::sleep(Duration::from_millis(10)).await;

        let err = svc.call(request()).await.unwrap_err();
        assert!(matches!(err, SelectionError::Overloaded));
    }

    #[tokio::test]
    async fn permit_released_after_completion() {
        let mut svc = LoadShedLayer::new(1).layer(SlowService { delay_ms: 1 });
        svc.call(request()).await.unwrap();
        assert!(svc.call(request()).await.is_ok());
    }
}
