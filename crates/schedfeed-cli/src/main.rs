//! schedfeed CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use schedfeed_core::{TracingConfig, init_tracing};
use schedfeed_importer::{
    FetchConfig, ImportError, ImportResult, ScheduleClient, import_schedule,
};

/// Fetch a published conference schedule and print it as normalized JSON.
#[derive(Debug, Parser)]
#[command(name = "schedfeed", version, about)]
struct Cli {
    /// Schedule URL. A `.json` suffix selects the JSON routine, anything
    /// else the frab XML routine.
    url: String,

    /// Group label stamped on every imported record.
    #[arg(short, long)]
    group: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    init_tracing(tracing_config).expect("failed to initialize tracing");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ImportResult<()> {
    let client = ScheduleClient::new(
        FetchConfig::default().with_timeout(Duration::from_secs(cli.timeout)),
    )?;

    let events = import_schedule(&client, &cli.url, &cli.group).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&events)
    } else {
        serde_json::to_string(&events)
    }
    .map_err(|e| ImportError::format("failed to serialize events").with_source(e))?;

    println!("{}", json);
    Ok(())
}
