//! logsweep binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use logsweep_cli::time::parse_local_timestamp;
use logsweep_cli::{Cli, CliError, CloudWatchClient, OutputFormat, SearchCommand, SweepConfig};
use logsweep_core::{SweepRequest, TimeRange};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directives(cli.verbose))),
        )
        .with_writer(io::stderr)
        .init();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,logsweep=info,logsweep_cli=info,logsweep_core=info",
        1 => "warn,logsweep=debug,logsweep_cli=debug,logsweep_core=debug",
        _ => "warn,logsweep=trace,logsweep_cli=trace,logsweep_core=trace",
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = SweepConfig::resolve(&cli)?;
    let range = TimeRange::new(
        parse_local_timestamp(&cli.start)?,
        parse_local_timestamp(&cli.end)?,
    )?;
    debug!(?config, %range, "resolved search");

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling search");
            interrupt.cancel();
        }
    });
    if let Some(timeout) = config.timeout() {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(timeout_secs = timeout.as_secs(), "search timed out");
            deadline.cancel();
        });
    }

    let client = CloudWatchClient::connect(config.profile.as_deref(), config.region.as_deref()).await;
    let request = SweepRequest::new(cli.filter, cli.log_group, range);
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    SearchCommand::new(config.driver_config())
        .execute(client, &mut stdout, &format, &request, &cancel)
        .await?;

    Ok(())
}
