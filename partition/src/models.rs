use chrono::{Local, NaiveDate};
use common::Result;

/// One partition to register: a (database, table, date) triple plus the
/// S3 locations involved.
///
/// `base_location` is concatenated directly with the year when building the
/// partition's data location, so callers must supply it with a trailing
/// separator (e.g. `s3://bucket/data/`).
#[derive(Debug, Clone)]
pub struct PartitionRequest {
    pub database: String,
    pub table: String,
    pub base_location: String,
    pub result_location: String,
    pub date: NaiveDate,
}

impl PartitionRequest {
    /// Builds a request from raw string inputs. `date` must be `YYYY-MM-DD`
    /// when given; the current local date is used otherwise.
    pub fn new(
        database: &str,
        table: &str,
        base_location: &str,
        result_location: &str,
        date: Option<&str>,
    ) -> Result<Self> {
        let date = match date {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
            None => Local::now().date_naive(),
        };

        Ok(Self {
            database: database.to_string(),
            table: table.to_string(),
            base_location: base_location.to_string(),
            result_location: result_location.to_string(),
            date,
        })
    }

    pub fn year(&self) -> String {
        self.date.format("%Y").to_string()
    }

    pub fn month(&self) -> String {
        self.date.format("%m").to_string()
    }

    pub fn day(&self) -> String {
        self.date.format("%d").to_string()
    }

    /// The physical location registered for the partition:
    /// `<base_location><YYYY>/<MM>/<DD>/`.
    pub fn data_location(&self) -> String {
        format!(
            "{}{}/{}/{}/",
            self.base_location,
            self.year(),
            self.month(),
            self.day()
        )
    }

    /// The ADD PARTITION DDL submitted to Athena.
    pub fn ddl_statement(&self) -> String {
        format!(
            "ALTER TABLE {} ADD PARTITION (year=\"{}\",month=\"{}\",day=\"{}\") LOCATION \"{}\"",
            self.table,
            self.year(),
            self.month(),
            self.day(),
            self.data_location()
        )
    }
}
