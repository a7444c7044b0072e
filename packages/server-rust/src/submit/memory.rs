//! In-memory job submitter for development and tests.
//!
//! [`RecordingSubmitter`] keeps every submitted [`JobDescription`] and hands
//! out sequential handles. Nothing is executed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use ahn_laz_core::{JobDescription, JobHandle};
use async_trait::async_trait;
use tracing::info;

use crate::traits::JobSubmitter;

/// Records submissions instead of running them.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<JobDescription>>,
    fail: AtomicBool,
}

fn poison_err<T>(_: PoisonError<T>) -> anyhow::Error {
    anyhow::anyhow!("recording submitter lock poisoned")
}

impl RecordingSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later submission fail as if the backend were down.
    pub fn fail_submissions(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all accepted submissions, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<JobDescription> {
        self.submitted
            .lock()
            .map(|jobs| jobs.clone())
            .unwrap_or_default()
    }

    /// Number of accepted submissions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.submitted.lock().map(|jobs| jobs.len()).unwrap_or_default()
    }
}

#[async_trait]
impl JobSubmitter for RecordingSubmitter {
    async fn submit(&self, job: JobDescription) -> anyhow::Result<JobHandle> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("recording submitter is configured to reject jobs");
        }
        let mut jobs = self.submitted.lock().map_err(poison_err)?;
        info!(command = %job.command_line(), "recorded job");
        jobs.push(job);
        Ok(JobHandle::new(format!("memory-{}", jobs.len())))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
