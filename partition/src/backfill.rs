use async_trait::async_trait;
use chrono::NaiveDate;
use common::{Error, Result};
use tracing::debug;

use crate::athena::{QueryService, register_partition};
use crate::models::PartitionRequest;
use crate::walker::LeafHandler;

/// Derives the partition date from a leaf prefix ending in `YYYY/MM/DD/`.
///
/// The three trailing segments must be numeric, fixed-width, and form a real
/// calendar date; anything else is a malformed leaf and fails the backfill.
pub fn date_from_leaf_prefix(prefix: &str) -> Result<NaiveDate> {
    let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
    let mut segments = trimmed.rsplit('/');
    let day = segments.next().unwrap_or("");
    let month = segments.next().unwrap_or("");
    let year = segments.next().unwrap_or("");

    let numeric = |segment: &str, width: usize| {
        segment.len() == width && segment.chars().all(|c| c.is_ascii_digit())
    };

    if !numeric(year, 4) || !numeric(month, 2) || !numeric(day, 2) {
        return Err(Error::MalformedPrefix(format!(
            "'{}' does not end in YYYY/MM/DD/ segments",
            prefix
        )));
    }

    // Widths are checked, so these cannot fail.
    let year: i32 = year.parse().unwrap_or_default();
    let month: u32 = month.parse().unwrap_or_default();
    let day: u32 = day.parse().unwrap_or_default();

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::MalformedPrefix(format!(
            "'{}' ends in {:04}/{:02}/{:02}/, which is not a calendar date",
            prefix, year, month, day
        ))
    })
}

/// Registers one partition per discovered leaf prefix.
pub struct PartitionBackfill<'a> {
    query: &'a dyn QueryService,
    database: &'a str,
    table: &'a str,
    base_location: &'a str,
    result_location: &'a str,
}

impl<'a> PartitionBackfill<'a> {
    pub fn new(
        query: &'a dyn QueryService,
        database: &'a str,
        table: &'a str,
        base_location: &'a str,
        result_location: &'a str,
    ) -> Self {
        Self {
            query,
            database,
            table,
            base_location,
            result_location,
        }
    }
}

#[async_trait]
impl LeafHandler for PartitionBackfill<'_> {
    async fn on_leaf(&self, prefix: &str) -> Result<()> {
        let date = date_from_leaf_prefix(prefix)?;
        debug!(prefix = %prefix, date = %date, "Registering discovered partition");

        let request = PartitionRequest {
            database: self.database.to_string(),
            table: self.table.to_string(),
            base_location: self.base_location.to_string(),
            result_location: self.result_location.to_string(),
            date,
        };

        register_partition(self.query, &request).await?;
        Ok(())
    }
}
