//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Search CloudWatch Logs for messages matching a filter over any time range.
#[derive(Parser, Debug, Clone)]
#[command(name = "logsweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// AWS shared-config profile to use.
    #[arg(short, long, env = "LOGSWEEP_PROFILE")]
    pub profile: Option<String>,

    /// AWS region (defaults to the profile's region).
    #[arg(short, long, env = "LOGSWEEP_REGION")]
    pub region: Option<String>,

    /// Log group to search.
    #[arg(short = 'g', long)]
    pub log_group: String,

    /// Pattern matched against @message.
    #[arg(short, long)]
    pub filter: String,

    /// Start of the search, local time as YYYYMMDDhhmmss.
    #[arg(short, long)]
    pub start: String,

    /// End of the search (exclusive), local time as YYYYMMDDhhmmss.
    #[arg(short, long)]
    pub end: String,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Widest window submitted as one query, in seconds.
    #[arg(long)]
    pub window_secs: Option<i64>,

    /// Maximum records returned per window.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Seconds between status polls of a running query.
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Number of windows queried concurrently.
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Abort the whole search after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Result count per window followed by one message per line.
    #[default]
    Text,
    /// One JSON object per window per line.
    Json,
}
