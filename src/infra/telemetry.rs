use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::jobs::{
    METRIC_DOWNLOADS, METRIC_DOWNLOADS_FAILED, METRIC_JOBS_FAILED, METRIC_JOBS_RENDERED,
    METRIC_JOBS_SUBMITTED, METRIC_RENDER_REPLAYED,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_JOBS_SUBMITTED,
            Unit::Count,
            "Total number of render jobs accepted."
        );
        describe_counter!(
            METRIC_JOBS_RENDERED,
            Unit::Count,
            "Total number of jobs rendered by the external API."
        );
        describe_counter!(
            METRIC_JOBS_FAILED,
            Unit::Count,
            "Total number of render attempts that failed."
        );
        describe_counter!(
            METRIC_RENDER_REPLAYED,
            Unit::Count,
            "Total number of process calls answered from an already rendered job."
        );
        describe_counter!(
            METRIC_DOWNLOADS,
            Unit::Count,
            "Total number of rendered documents relayed to callers."
        );
        describe_counter!(
            METRIC_DOWNLOADS_FAILED,
            Unit::Count,
            "Total number of failed document downloads."
        );
    });
}
