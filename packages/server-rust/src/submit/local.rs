//! Local process backend: runs the slicer on this host as a detached child.

use std::process::Stdio;

use ahn_laz_core::{JobDescription, JobHandle};
use anyhow::Context as _;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};
use uuid::Uuid;

use crate::traits::JobSubmitter;

/// Spawns each job as a child process and returns immediately.
///
/// The child is reaped by a background task that logs its exit status; the
/// caller only learns whether the process could be started.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessSubmitter;

impl LocalProcessSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JobSubmitter for LocalProcessSubmitter {
    async fn submit(&self, job: JobDescription) -> anyhow::Result<JobHandle> {
        let handle = JobHandle::new(format!("local-{}", Uuid::new_v4()));

        let mut child = Command::new(job.executable())
            .args(job.arguments())
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start `{}`", job.executable()))?;

        info!(job_id = %handle, pid = child.id(), command = %job.command_line(), "slicer started");

        let job_id = handle.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!(job_id = %job_id, "slicer finished"),
                Ok(status) => warn!(job_id = %job_id, %status, "slicer exited with failure"),
                Err(e) => warn!(job_id = %job_id, error = %e, "failed to wait for slicer"),
            }
        });

        Ok(handle)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_existing_executable() {
        let job = JobDescription::new("true", vec!["1".into(), "2".into()]);
        let handle = LocalProcessSubmitter::new().submit(job).await.unwrap();
        assert!(handle.id().starts_with("local-"));
    }

    #[tokio::test]
    async fn missing_executable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-slicer");
        let job = JobDescription::new(missing.to_string_lossy(), Vec::new());

        let err = LocalProcessSubmitter::new().submit(job).await.unwrap_err();
        assert!(err.to_string().contains("no-such-slicer"));
    }

    #[tokio::test]
    async fn handles_are_unique() {
        let submitter = LocalProcessSubmitter::new();
        let a = submitter.submit(JobDescription::new("true", Vec::new())).await.unwrap();
        let b = submitter.submit(JobDescription::new("true", Vec::new())).await.unwrap();
        assert_ne!(a, b);
    }
}
