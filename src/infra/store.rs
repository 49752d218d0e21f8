//! Volatile in-process job storage.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::application::repos::{JobStore, StoreError};
use crate::domain::jobs::JobRecord;

/// Job records held for the lifetime of the process.
///
/// Records are never evicted, so memory grows with every submission until the
/// process restarts. Each mutation holds a shard lock only while the record is
/// updated and never across an `.await`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryJobStore {
    jobs: Arc<DashMap<String, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
        }
    }

    fn update(
        &self,
        id: &str,
        apply: impl FnOnce(&mut JobRecord),
    ) -> Result<JobRecord, StoreError> {
        let mut entry = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        apply(entry.value_mut());
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, payload: Value) -> JobRecord {
        let record = JobRecord::pending(payload);
        self.jobs.insert(record.id.clone(), record.clone());
        record
    }

    async fn get(&self, id: &str) -> Option<JobRecord> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    async fn mark_done(&self, id: &str, render_id: &str) -> Result<JobRecord, StoreError> {
        self.update(id, |job| job.mark_done(render_id))
    }

    async fn mark_failed(&self, id: &str) -> Result<JobRecord, StoreError> {
        self.update(id, JobRecord::mark_failed)
    }

    async fn len(&self) -> usize {
        self.jobs.len()
    }
}
