// AWS Lambda adapter: translates the trigger event into a PartitionJob and
// forwards it to the same dispatch the CLI uses. The runtime provides the
// tokio event loop; clients are built once and shared across invocations.

use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

use partition::PartitionJob;
use partition::athena::AthenaQueryService;
use partition::storage::s3::S3PrefixLister;

/// The trigger event. Field names match the CLI flag surface.
#[derive(Debug, Deserialize)]
pub struct PartitionEvent {
    pub database: String,
    pub table: String,
    pub location: String,
    pub query_result_location: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub load_all: Option<bool>,
    #[serde(default)]
    pub log_level: Option<String>,
}

struct HandlerState {
    query: AthenaQueryService,
    lister: S3PrefixLister,
    log_filter: reload::Handle<EnvFilter, Registry>,
}

async fn handle_event(
    event: LambdaEvent<PartitionEvent>,
    state: Arc<HandlerState>,
) -> Result<(), Error> {
    let (payload, context) = event.into_parts();

    // The event may adjust verbosity per invocation; the subscriber itself
    // is installed once, so only the filter is swapped.
    if let Some(level) = &payload.log_level {
        match EnvFilter::try_new(level.to_lowercase()) {
            Ok(filter) => {
                if let Err(e) = state.log_filter.reload(filter) {
                    warn!(error = %e, "Failed to apply event log level");
                }
            }
            Err(e) => warn!(level = %level, error = %e, "Unrecognized event log level"),
        }
    }

    info!(event = ?payload, "Invoked by Lambda event");
    info!(request_id = %context.request_id, "Request ID");
    info!(
        log_stream = %context.env_config.log_stream,
        log_group = %context.env_config.log_group,
        memory_limit_mb = context.env_config.memory,
        "Execution environment"
    );

    let job = PartitionJob {
        database: payload.database,
        table: payload.table,
        location: payload.location,
        query_result_location: payload.query_result_location,
        date: payload.date,
        load_all: payload.load_all.unwrap_or(false),
    };

    partition::run_with(job, &state.query, &state.lister).await?;
    Ok(())
}

/// Lambda runtime entry point.
pub async fn run() -> Result<(), Error> {
    let (filter, log_filter) = reload::Layer::new(EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let state = Arc::new(HandlerState {
        query: AthenaQueryService::new(&config),
        lister: S3PrefixLister::new(&config),
        log_filter,
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<PartitionEvent>| {
        let state = state.clone();
        async move { handle_event(event, state).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_event() {
        let event: PartitionEvent = serde_json::from_str(
            r#"{
                "database": "db1",
                "table": "t1",
                "location": "s3://b/d/",
                "query_result_location": "s3://b/results/",
                "date": "2022-12-01",
                "load_all": true,
                "log_level": "DEBUG"
            }"#,
        )
        .unwrap();

        assert_eq!(event.database, "db1");
        assert_eq!(event.table, "t1");
        assert_eq!(event.location, "s3://b/d/");
        assert_eq!(event.query_result_location, "s3://b/results/");
        assert_eq!(event.date.as_deref(), Some("2022-12-01"));
        assert_eq!(event.load_all, Some(true));
        assert_eq!(event.log_level.as_deref(), Some("DEBUG"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let event: PartitionEvent = serde_json::from_str(
            r#"{
                "database": "db1",
                "table": "t1",
                "location": "s3://b/d/",
                "query_result_location": "s3://b/results/"
            }"#,
        )
        .unwrap();

        assert!(event.date.is_none());
        assert!(event.load_all.is_none());
        assert!(event.log_level.is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result: Result<PartitionEvent, _> =
            serde_json::from_str(r#"{ "database": "db1", "table": "t1" }"#);
        assert!(result.is_err());
    }
}
