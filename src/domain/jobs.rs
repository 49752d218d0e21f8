//! Render job records and their lifecycle transitions.

use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

pub use docrelay_api_types::JobStatus;

/// A document payload awaiting, or having undergone, external rendering.
///
/// `render_id` is populated exactly when `status` is [`JobStatus::Done`]; go
/// through the transition helpers to keep the two in step.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: String,
    pub payload: Value,
    pub status: JobStatus,
    pub render_id: Option<String>,
    pub created_at: OffsetDateTime,
}

impl JobRecord {
    /// Build a fresh pending record with a newly minted identifier.
    pub fn pending(payload: Value) -> Self {
        Self {
            id: new_job_id(),
            payload,
            status: JobStatus::Pending,
            render_id: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// The render identifier to replay, if this job already rendered successfully.
    pub fn completed_render_id(&self) -> Option<&str> {
        match self.status {
            JobStatus::Done => self.render_id.as_deref(),
            JobStatus::Pending | JobStatus::Failed => None,
        }
    }

    pub fn mark_done(&mut self, render_id: impl Into<String>) {
        self.status = JobStatus::Done;
        self.render_id = Some(render_id.into());
    }

    /// Record a failed attempt. A job that already rendered keeps its result.
    pub fn mark_failed(&mut self) {
        if self.status == JobStatus::Done {
            return;
        }
        self.status = JobStatus::Failed;
        self.render_id = None;
    }
}

/// Identifiers are hyphenated UUIDv4 strings: unique per process and safe as a
/// URL path segment.
fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pending_record_has_no_render_id() {
        let record = JobRecord::pending(json!({"name": "Alice"}));
        assert_eq!(record.status, JobStatus::Pending);
        assert!(record.render_id.is_none());
        assert!(record.completed_render_id().is_none());
    }

    #[test]
    fn identifiers_are_unique_and_path_safe() {
        let first = JobRecord::pending(Value::Null);
        let second = JobRecord::pending(Value::Null);
        assert_ne!(first.id, second.id);
        assert!(
            first
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        );
    }

    #[test]
    fn failed_job_can_still_complete() {
        let mut record = JobRecord::pending(Value::Null);
        record.mark_failed();
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.completed_render_id().is_none());

        record.mark_done("R1");
        assert_eq!(record.completed_render_id(), Some("R1"));
    }

    #[test]
    fn done_is_terminal() {
        let mut record = JobRecord::pending(Value::Null);
        record.mark_done("R1");
        record.mark_failed();
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.render_id.as_deref(), Some("R1"));
    }
}
