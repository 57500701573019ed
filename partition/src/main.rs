use clap::{Arg, ArgAction, Command};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

use partition::PartitionJob;

#[tokio::main]
async fn main() {
    let matches = Command::new("partition-cli")
        .version("1.0")
        .about("Adds year/month/day partitions to an Athena table")
        .arg(
            Arg::new("database")
                .long("database")
                .required(true)
                .help("The Athena database name"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .required(true)
                .help("The Athena table name"),
        )
        .arg(
            Arg::new("location")
                .long("location")
                .required(true)
                .help("The S3 location of the data (S3 URI)"),
        )
        .arg(
            Arg::new("query-result-location")
                .long("query-result-location")
                .required(true)
                .help("The S3 location to store Athena query results (S3 URI)"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .help("The date of the partition (YYYY-MM-DD, default: today)"),
        )
        .arg(
            Arg::new("load-all")
                .long("load-all")
                .action(ArgAction::SetTrue)
                .help("Load all available partitions"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("INFO")
                .help("The logging level (TRACE, DEBUG, INFO, WARN, ERROR)"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map(|s| s.as_str())
        .unwrap_or("INFO");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_lowercase()))
        .init();

    let job = PartitionJob {
        database: matches
            .get_one::<String>("database")
            .cloned()
            .unwrap_or_default(),
        table: matches
            .get_one::<String>("table")
            .cloned()
            .unwrap_or_default(),
        location: matches
            .get_one::<String>("location")
            .cloned()
            .unwrap_or_default(),
        query_result_location: matches
            .get_one::<String>("query-result-location")
            .cloned()
            .unwrap_or_default(),
        date: matches.get_one::<String>("date").cloned(),
        load_all: matches.get_flag("load-all"),
    };

    if let Err(e) = partition::run(job).await {
        error!("Partition registration error: {}", e);
        process::exit(1);
    }
}
