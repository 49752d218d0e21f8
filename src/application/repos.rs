//! Storage traits describing where job records live.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::jobs::JobRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job `{id}` not found")]
    NotFound { id: String },
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Owner of every job record.
///
/// No other component mutates a record directly; callers read snapshots via
/// [`JobStore::get`] and request transitions through the `mark_*` methods.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new pending record for `payload` and return a snapshot of it.
    async fn create(&self, payload: Value) -> JobRecord;

    async fn get(&self, id: &str) -> Option<JobRecord>;

    async fn mark_done(&self, id: &str, render_id: &str) -> Result<JobRecord, StoreError>;

    async fn mark_failed(&self, id: &str) -> Result<JobRecord, StoreError>;

    /// Number of records currently held.
    async fn len(&self) -> usize;
}
