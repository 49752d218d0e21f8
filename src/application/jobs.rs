use std::sync::Arc;

use bytes::Bytes;
use metrics::counter;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::application::repos::{JobStore, StoreError};
use crate::application::upstream::{RenderApi, UpstreamError};
use crate::domain::jobs::JobRecord;

pub(crate) const METRIC_JOBS_SUBMITTED: &str = "docrelay_jobs_submitted_total";
pub(crate) const METRIC_JOBS_RENDERED: &str = "docrelay_jobs_rendered_total";
pub(crate) const METRIC_JOBS_FAILED: &str = "docrelay_jobs_failed_total";
pub(crate) const METRIC_RENDER_REPLAYED: &str = "docrelay_render_cache_hit_total";
pub(crate) const METRIC_DOWNLOADS: &str = "docrelay_downloads_total";
pub(crate) const METRIC_DOWNLOADS_FAILED: &str = "docrelay_downloads_failed_total";

#[derive(Debug, Error)]
pub enum JobError {
    #[error("rendering API credentials are not configured")]
    NotConfigured,
    #[error("job `{0}` not found")]
    NotFound(String),
    /// Application-level failure reported by the rendering API.
    #[error("rendering API rejected job `{job_id}`")]
    Rejected { job_id: String, body: Value },
    #[error("rendering job `{job_id}` failed")]
    Render {
        job_id: String,
        #[source]
        source: UpstreamError,
    },
    #[error("download of render `{render_id}` failed")]
    Download {
        render_id: String,
        #[source]
        source: UpstreamError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives the submit → process → download lifecycle of render jobs.
#[derive(Clone)]
pub struct RenderJobService {
    store: Arc<dyn JobStore>,
    api: Arc<dyn RenderApi>,
}

impl RenderJobService {
    pub fn new(store: Arc<dyn JobStore>, api: Arc<dyn RenderApi>) -> Self {
        Self { store, api }
    }

    pub fn accepts_submissions(&self) -> bool {
        self.api.credentials_configured()
    }

    /// Accept a document payload and park it as a pending job.
    ///
    /// Identical payloads are not deduplicated; every call mints a new job.
    pub async fn submit(&self, payload: Value) -> Result<JobRecord, JobError> {
        if !self.accepts_submissions() {
            return Err(JobError::NotConfigured);
        }

        let record = self.store.create(payload).await;
        counter!(METRIC_JOBS_SUBMITTED).increment(1);
        let stored_jobs = self.store.len().await;
        info!(
            target = "docrelay::jobs",
            job_id = %record.id,
            stored_jobs = stored_jobs,
            "job queued, awaiting processing"
        );
        Ok(record)
    }

    /// Render a stored job through the external API and return its render id.
    ///
    /// A job that already rendered replays its render id without calling the
    /// API again. Failed jobs are attempted afresh on every call.
    pub async fn process(&self, job_id: &str) -> Result<String, JobError> {
        let job = self
            .store
            .get(job_id)
            .await
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

        if let Some(render_id) = job.completed_render_id() {
            counter!(METRIC_RENDER_REPLAYED).increment(1);
            return Ok(render_id.to_string());
        }

        match self.api.render(&job.payload).await {
            Ok(render_id) => {
                self.store.mark_done(job_id, &render_id).await?;
                counter!(METRIC_JOBS_RENDERED).increment(1);
                let queued_ms = (OffsetDateTime::now_utc() - job.created_at).whole_milliseconds();
                info!(
                    target = "docrelay::jobs",
                    job_id = %job_id,
                    render_id = %render_id,
                    queued_ms = %queued_ms,
                    "job rendered"
                );
                Ok(render_id)
            }
            Err(UpstreamError::Rejected { body }) => {
                self.store.mark_failed(job_id).await?;
                counter!(METRIC_JOBS_FAILED).increment(1);
                warn!(
                    target = "docrelay::jobs",
                    job_id = %job_id,
                    body = %body,
                    "rendering API rejected job"
                );
                Err(JobError::Rejected {
                    job_id: job_id.to_string(),
                    body,
                })
            }
            Err(source) => {
                self.store.mark_failed(job_id).await?;
                counter!(METRIC_JOBS_FAILED).increment(1);
                error!(
                    target = "docrelay::jobs",
                    job_id = %job_id,
                    error = %source,
                    "job rendering failed"
                );
                Err(JobError::Render {
                    job_id: job_id.to_string(),
                    source,
                })
            }
        }
    }

    /// Fetch the finished PDF for an external render id.
    ///
    /// The id is passed straight through to the API; it is not correlated with
    /// any stored job.
    pub async fn download(&self, render_id: &str) -> Result<Bytes, JobError> {
        match self.api.download(render_id).await {
            Ok(bytes) => {
                counter!(METRIC_DOWNLOADS).increment(1);
                Ok(bytes)
            }
            Err(source) => {
                counter!(METRIC_DOWNLOADS_FAILED).increment(1);
                error!(
                    target = "docrelay::jobs",
                    render_id = %render_id,
                    error = %source,
                    "failed to download rendered document"
                );
                Err(JobError::Download {
                    render_id: render_id.to_string(),
                    source,
                })
            }
        }
    }

    pub async fn find_job(&self, job_id: &str) -> Option<JobRecord> {
        self.store.get(job_id).await
    }
}
