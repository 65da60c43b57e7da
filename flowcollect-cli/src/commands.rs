use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use flowcollect_config::{CollectorConfig, InterfaceConfig};
use flowcollect_flow::raw::LAYOUT;
use flowcollect_flow::{read_from_async, ClockReference, Record, RAW_RECORD_SIZE};
use flowcollect_telemetry::logging::EventLogger;
use flowcollect_telemetry::metrics::MetricsRecorder;

use crate::error::CliError;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file (defaults to config/flowcollect.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a raw record stream into JSON records
    Decode(DecodeArgs),
    /// Print the packed kernel record layout
    Layout,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DecodeArgs {
    /// Raw record file or pipe; standard input when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<u64>,
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
    /// Dump Prometheus counters to stderr on exit
    #[arg(long)]
    pub print_metrics: bool,
}

impl DecodeArgs {
    /// Command line flags win over the configuration file.
    fn apply(&self, config: &mut CollectorConfig) {
        if let Some(path) = &self.input {
            config.input.path = Some(path.clone());
        }
        if let Some(max) = self.max_records {
            config.input.max_records = max;
        }
        config.output.pretty |= self.pretty;
        config.telemetry.print_metrics |= self.print_metrics;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub decoded: u64,
    pub errors: u64,
}

pub async fn run_decode(
    args: DecodeArgs,
    mut config: CollectorConfig,
    metrics: &MetricsRecorder,
) -> Result<(), CliError> {
    args.apply(&mut config);

    let source = match &config.input.path {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    };
    let input: Box<dyn AsyncRead + Unpin + Send> = match &config.input.path {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };
    tracing::info!(source = %source, record_size = RAW_RECORD_SIZE, "Decoding raw flow records");

    let reader = BufReader::with_capacity(config.input.read_buffer_size, input);
    let writer = BufWriter::new(tokio::io::stdout());
    let result = decode_stream(reader, writer, &config, metrics).await;

    let stats = match &result {
        Ok(stats) => *stats,
        Err(_) => DecodeStats {
            decoded: metrics.records_decoded.get(),
            errors: metrics.decode_errors.get(),
        },
    };
    EventLogger::log_decode_summary(&source, stats.decoded, stats.errors);
    if config.telemetry.print_metrics {
        eprint!("{}", metrics.gather_metrics()?);
    }
    result.map(|_| ())
}

/// Decodes records from `reader` until end of stream (or the configured
/// limit) and writes one JSON document per record to `writer`.
///
/// A truncated trailing record or a failing reader stops the session with
/// an error; records already written stay written.
pub async fn decode_stream<R, W>(
    mut reader: R,
    mut writer: W,
    config: &CollectorConfig,
    metrics: &MetricsRecorder,
) -> Result<DecodeStats, CliError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let interfaces: &InterfaceConfig = &config.interfaces;
    let namer = |if_index: u32| interfaces.name_for(if_index);
    let mut stats = DecodeStats::default();

    while config.input.max_records == 0 || stats.decoded < config.input.max_records {
        let raw = match read_from_async(&mut reader).await {
            Ok(raw) => raw,
            Err(e) if e.is_clean_eof() => break,
            Err(e) => {
                stats.errors += 1;
                metrics.inc_decode_errors();
                tracing::error!(error = %e, decoded = stats.decoded, "Failed to decode record");
                writer.flush().await?;
                return Err(e.into());
            }
        };

        let clock = ClockReference::now()?;
        let record = Record::from_raw(raw, &clock, &namer);
        let line = if config.output.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;

        stats.decoded += 1;
        metrics.inc_records_decoded(record.metrics().bytes);
    }

    writer.flush().await?;
    Ok(stats)
}

/// Loads `path` when given, otherwise the default file and environment.
pub fn load_config(path: Option<&Path>) -> Result<CollectorConfig, CliError> {
    let config = match path {
        Some(path) => CollectorConfig::load_from_path(path)?,
        None => CollectorConfig::load()?,
    };
    Ok(config)
}

/// Writes the packed kernel record layout as a table.
pub fn print_layout<W: Write>(out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{:<18} {:>6} {:>4}", "field", "offset", "size")?;
    for field in LAYOUT {
        writeln!(out, "{:<18} {:>6} {:>4}", field.name, field.offset, field.size)?;
    }
    writeln!(out, "{:<18} {:>6} {:>4}", "total", "", RAW_RECORD_SIZE)?;
    Ok(())
}
