use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::SdkError;
use common::Result;

#[async_trait]
pub trait PrefixLister: Send + Sync {
    /// Lists the immediate child prefixes under `prefix`, one path segment
    /// deep per the delimiter. An empty result means `prefix` is a leaf.
    async fn list_child_prefixes(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<String>>;
}

pub struct S3PrefixLister {
    client: S3Client,
}

impl S3PrefixLister {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: S3Client::new(config),
        }
    }
}

#[async_trait]
impl PrefixLister for S3PrefixLister {
    async fn list_child_prefixes(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<String>> {
        let mut prefixes = Vec::new();
        let mut continuation_token = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .delimiter(delimiter);

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| match e {
                SdkError::ServiceError(err) => common::Error::Storage(err.into_err().to_string()),
                _ => common::Error::Storage(e.to_string()),
            })?;

            if let Some(common_prefixes) = response.common_prefixes {
                for common_prefix in common_prefixes {
                    if let Some(child) = common_prefix.prefix {
                        prefixes.push(child);
                    }
                }
            }

            continuation_token = response.next_continuation_token;
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(prefixes)
    }
}
