pub mod athena;
pub mod backfill;
pub mod models;
pub mod storage;
pub mod walker;

use common::Result;
use tracing::info;

use athena::{AthenaQueryService, QueryService, register_partition};
use backfill::PartitionBackfill;
use models::PartitionRequest;
use storage::S3Address;
use storage::s3::{PrefixLister, S3PrefixLister};
use walker::{DEFAULT_MAX_DEPTH, walk};

/// The single internal call signature. Both entry points (CLI flags and the
/// Lambda event payload) translate their inputs into one of these.
#[derive(Debug, Clone)]
pub struct PartitionJob {
    pub database: String,
    pub table: String,
    pub location: String,
    pub query_result_location: String,
    /// `YYYY-MM-DD`; defaults to today. Ignored when `load_all` is set.
    pub date: Option<String>,
    pub load_all: bool,
}

/// Builds AWS clients from the default credential chain and runs the job.
pub async fn run(job: PartitionJob) -> Result<()> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let query = AthenaQueryService::new(&config);
    let lister = S3PrefixLister::new(&config);

    run_with(job, &query, &lister).await
}

/// Runs a job against injected collaborators.
pub async fn run_with(
    job: PartitionJob,
    query: &dyn QueryService,
    lister: &dyn PrefixLister,
) -> Result<()> {
    if job.load_all {
        info!("Loading all available partitions");
        backfill_all(&job, query, lister).await
    } else {
        info!("Loading single partition");
        let request = PartitionRequest::new(
            &job.database,
            &job.table,
            &job.location,
            &job.query_result_location,
            job.date.as_deref(),
        )?;
        register_partition(query, &request).await?;
        Ok(())
    }
}

async fn backfill_all(
    job: &PartitionJob,
    query: &dyn QueryService,
    lister: &dyn PrefixLister,
) -> Result<()> {
    let address = S3Address::parse(&job.location)?;
    let handler = PartitionBackfill::new(
        query,
        &job.database,
        &job.table,
        &job.location,
        &job.query_result_location,
    );

    walk(
        lister,
        &address.bucket,
        &address.prefix,
        &handler,
        DEFAULT_MAX_DEPTH,
    )
    .await
}
