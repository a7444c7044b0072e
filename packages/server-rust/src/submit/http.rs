//! Remote backend: posts job descriptions to an HTTP job service.

use std::time::Duration;

use ahn_laz_core::{JobDescription, JobHandle};
use anyhow::Context as _;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::traits::JobSubmitter;

/// Body the job service answers with on acceptance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    job_id: String,
}

/// Submits jobs as JSON to `POST <url>`.
///
/// The request body is the serialised [`JobDescription`]. Any non-2xx status,
/// transport failure, or body without a `jobId` is a submission error.
#[derive(Debug, Clone)]
pub struct HttpJobSubmitter {
    url: String,
    client: reqwest::Client,
}

impl HttpJobSubmitter {
    /// Creates a submitter for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build job service client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JobSubmitter for HttpJobSubmitter {
    async fn submit(&self, job: JobDescription) -> anyhow::Result<JobHandle> {
        let response = self
            .client
            .post(&self.url)
            .json(&job)
            .send()
            .await
            .with_context(|| format!("job service at {} unreachable", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("job service rejected job with status {status}: {body}");
        }

        let accepted: SubmitResponse = response
            .json()
            .await
            .context("job service returned a malformed acceptance")?;

        info!(job_id = %accepted.job_id, url = %self.url, "job accepted by job service");
        Ok(JobHandle::new(accepted.job_id))
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
