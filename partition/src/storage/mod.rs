pub mod s3;

use common::{Error, Result};

const S3_SCHEME: &str = "s3://";

/// A storage location split into bucket and key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Address {
    pub bucket: String,
    pub prefix: String,
}

impl S3Address {
    /// Parses an S3 URI (or bare `bucket/key` path) by stripping the scheme
    /// and splitting on the first separator.
    pub fn parse(location: &str) -> Result<Self> {
        let path = location.strip_prefix(S3_SCHEME).unwrap_or(location);

        let (bucket, prefix) = match path.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None => (path, ""),
        };

        if bucket.is_empty() {
            return Err(Error::InvalidUri(format!(
                "no bucket in location '{}'",
                location
            )));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }
}
