//! # logsweep-cli
//!
//! Command-line front end for `logsweep-core`.
//!
//! Provides:
//! - Argument parsing and layered TOML configuration
//! - Local-time `YYYYMMDDhhmmss` parsing
//! - A CloudWatch Logs Insights [`LogQueryClient`](logsweep_core::LogQueryClient)
//! - Text and JSON-lines rendering of window results
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  SweepRequest   ┌───────────────┐  StartQuery /    ┌────────────┐
//! │ logsweep-cli │────────────────►│ logsweep-core │─────────────────►│ CloudWatch │
//! └──────────────┘◄────────────────└───────────────┘  GetQueryResults └────────────┘
//!                   WindowOutcome
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod cloudwatch;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod time;

pub use cli::{Cli, Format};
pub use cloudwatch::CloudWatchClient;
pub use commands::SearchCommand;
pub use config::SweepConfig;
pub use error::CliError;
pub use output::OutputFormat;
