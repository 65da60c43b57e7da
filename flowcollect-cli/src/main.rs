//! ## flowcollect-cli
//! **Collector entrypoint**
//! Decodes the packed flow records written by the kernel probe and prints
//! them as JSON, one record per line.

use clap::Parser;
use flowcollect_telemetry::logging::EventLogger;
use flowcollect_telemetry::metrics::MetricsRecorder;

mod commands;
mod error;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout => commands::print_layout(&mut std::io::stdout().lock())?,
        Commands::Decode(decode_args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            EventLogger::init(&config.telemetry.log_filter)?;
            tracing::debug!(
                path = ?cli.config,
                input = ?config.input.path,
                "Configuration loaded"
            );
            let metrics = MetricsRecorder::new()?;
            commands::run_decode(decode_args, config, &metrics).await?;
        }
    }
    Ok(())
}
