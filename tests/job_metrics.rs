use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

use docrelay::application::jobs::RenderJobService;
use docrelay::application::upstream::{RenderApi, UpstreamError};
use docrelay::infra::store::InMemoryJobStore;
use docrelay::infra::telemetry;

struct QueueApi {
    outcomes: Mutex<Vec<Result<String, UpstreamError>>>,
}

#[async_trait]
impl RenderApi for QueueApi {
    fn credentials_configured(&self) -> bool {
        true
    }

    async fn render(&self, _payload: &Value) -> Result<String, UpstreamError> {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop()
            .unwrap_or_else(|| Err(UpstreamError::transport("exhausted")))
    }

    async fn download(&self, render_id: &str) -> Result<Bytes, UpstreamError> {
        if render_id == "R1" {
            Ok(Bytes::from_static(b"%PDF"))
        } else {
            Err(UpstreamError::transport("unexpected status 404 Not Found"))
        }
    }
}

#[tokio::test]
async fn job_lifecycle_emits_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    // Popped from the back: first render succeeds, second is rejected.
    let api = Arc::new(QueueApi {
        outcomes: Mutex::new(vec![
            Err(UpstreamError::Rejected {
                body: json!({"success": false}),
            }),
            Ok("R1".to_string()),
        ]),
    });
    let service = RenderJobService::new(Arc::new(InMemoryJobStore::new()), api);

    let rendered = service.submit(json!({"name": "Alice"})).await.expect("submit");
    let rejected = service.submit(json!({"name": "Bob"})).await.expect("submit");

    service.process(&rendered.id).await.expect("render");
    service.process(&rendered.id).await.expect("replay");
    service.process(&rejected.id).await.expect_err("rejected");
    service.download("R1").await.expect("download");
    service.download("R404").await.expect_err("download failure");

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    let expected = [
        ("docrelay_jobs_submitted_total", 2),
        ("docrelay_jobs_rendered_total", 1),
        ("docrelay_render_cache_hit_total", 1),
        ("docrelay_jobs_failed_total", 1),
        ("docrelay_downloads_total", 1),
        ("docrelay_downloads_failed_total", 1),
    ];

    for (metric, count) in expected {
        assert_eq!(counters.get(metric), Some(&count), "counter {metric}");
    }
}
