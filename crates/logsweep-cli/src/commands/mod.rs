//! CLI command implementations.
//!
//! - [`search`] - Sweep a log group for messages matching a filter

pub mod search;

pub use search::SearchCommand;
