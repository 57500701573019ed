use crate::models::PartitionRequest;
use async_trait::async_trait;
use aws_sdk_athena::Client as AthenaClient;
use aws_sdk_athena::error::SdkError;
use aws_sdk_athena::types::{QueryExecutionContext, ResultConfiguration};
use common::Result;
use tracing::info;

/// Seam for the query service so tests can capture submitted statements.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits a DDL statement and returns the service's execution id.
    /// Fire-and-forget: the statement is queued, never awaited.
    async fn submit_ddl(
        &self,
        statement: &str,
        database: &str,
        output_location: &str,
    ) -> Result<String>;
}

pub struct AthenaQueryService {
    client: AthenaClient,
}

impl AthenaQueryService {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: AthenaClient::new(config),
        }
    }
}

#[async_trait]
impl QueryService for AthenaQueryService {
    async fn submit_ddl(
        &self,
        statement: &str,
        database: &str,
        output_location: &str,
    ) -> Result<String> {
        let response = self
            .client
            .start_query_execution()
            .query_string(statement)
            .query_execution_context(
                QueryExecutionContext::builder().database(database).build(),
            )
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(err) => common::Error::Query(err.into_err().to_string()),
                _ => common::Error::Query(e.to_string()),
            })?;

        response
            .query_execution_id()
            .map(|id| id.to_string())
            .ok_or_else(|| {
                common::Error::Query("query submission returned no execution id".to_string())
            })
    }
}

/// Registers one partition by submitting its ADD PARTITION statement.
///
/// Returns the execution id without waiting for the query to complete;
/// duplicate-partition handling is Athena's concern.
pub async fn register_partition(
    query: &dyn QueryService,
    request: &PartitionRequest,
) -> Result<String> {
    let statement = request.ddl_statement();
    info!(statement = %statement, "Submitting partition DDL");

    let execution_id = query
        .submit_ddl(&statement, &request.database, &request.result_location)
        .await?;

    info!(execution_id = %execution_id, "Partition DDL queued");
    Ok(execution_id)
}
