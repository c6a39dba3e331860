use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod azure;
mod cmd;
mod io;
mod output;
mod terraform;

/// Environment variable holding the log filter, e.g. `TFSHIFT_LOG=debug`.
const LOG_ENV: &str = "TFSHIFT_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    output::init(cli.json, cli.no_color);
    init_tracing();

    match cmd::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::fatal(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
